use thiserror::Error;

/// The result of attempting an invalid operation on a room or its game.
///
/// The message strings are part of the observable contract: clients display
/// them verbatim and the test suite matches on them.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid player count: {count}. Must be 5-10 players.")]
    InvalidPlayerCount { count: usize },
    #[error("Need at least 5 players to start")]
    TooFewPlayers,
    #[error("Maximum 10 players allowed")]
    TooManyPlayers,
    #[error("No room or user")]
    NoContext,
    #[error("Room does not exist")]
    RoomNotFound,
    #[error("No player exists with the given id")]
    PlayerNotFound,
    #[error("Cannot join a game in progress")]
    CannotJoinStartedGame,
    #[error("Only admin can start the game")]
    NotAdmin,
    #[error("Only admin can reset the game")]
    ResetNotAllowed,
    #[error("Only President can investigate players")]
    NotPresident,
    #[error("Investigation power already used in this game")]
    InvestigationAlreadyUsed,
    #[error("Target player not found")]
    TargetNotFound,
    #[error("Cannot investigate yourself")]
    SelfInvestigation,
    #[error("Player already investigated")]
    AlreadyInvestigated,
    #[error("Target role not found - game may not be started")]
    RoleNotAssigned,
    #[error("This action cannot be performed during this phase of the game")]
    InvalidAction,
}
