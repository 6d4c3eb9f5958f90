//! The rules engine: role distribution, assignment, asymmetric knowledge
//! and the one-shot investigation action. Everything here is a pure,
//! synchronous computation; persistence and privilege checks live in the
//! room layer.

pub use self::assign::{
    assign_roles, can_start_game, validate_role_assignment, RoleAssignment, StartCheck, Validation,
};
pub use self::investigation::{investigate, InvestigationRecord};
pub use self::player::{GamePlayer, Player};
pub use self::role::{
    distribution_for, knowledge_rules, KnowledgeRules, Party, Role, RoleDistribution,
};
pub use self::visibility::{visible_information, VisibleInformation};

mod assign;
mod investigation;
mod player;
mod role;
mod test;
mod visibility;
