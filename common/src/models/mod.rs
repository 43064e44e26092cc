//! Document models for the `users`, `teams` and `ideas` collections.

pub mod idea;
pub mod team;
pub mod user;

pub use idea::{CreateIdeaRequest, IdeaDocument, IdeaItem, ListIdeasQuery, UpdateIdeaRequest};
pub use team::{CreateTeamRequest, MembershipRequest, TeamDocument, TeamItem, UpdateTeamRequest};
pub use user::{
    ListUsersQuery, LoginRequest, RegisterRequest, UpdateProfileRequest, UserDocument, UserProfile,
};
