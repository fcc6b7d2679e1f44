//! Project membership rules
//!
//! A student is either a member of a project or not. Joining is offered only
//! to students with a free seat available who do not already belong to a
//! different project; leaving is offered to members.
//!
//! The one-project rule is a client-side pre-check. It only sees records that
//! name their team, so callers resolve listing entries to detail records first.
//! Nothing here guards the window between the check and the join request.

use crate::model::{Id, Project, User};

/// Per-project membership state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    NotMember,
    Member,
}

impl Membership {
    pub fn of(project: &Project, user: &User) -> Self {
        if project.has_member(user.id) {
            Membership::Member
        } else {
            Membership::NotMember
        }
    }
}

/// Why the join action is withheld
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinBlock {
    NotStudent,
    Full,
    MemberElsewhere { project_id: Id, project_name: String },
}

impl std::fmt::Display for JoinBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinBlock::NotStudent => f.write_str("Only students can join projects"),
            JoinBlock::Full => f.write_str("Project is full"),
            JoinBlock::MemberElsewhere { project_name, .. } => {
                write!(f, "You are already a member of {project_name}")
            }
        }
    }
}

/// The membership action a project view offers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Affordance {
    Join,
    Leave,
    Unavailable(JoinBlock),
}

impl Affordance {
    pub fn can_join(&self) -> bool {
        matches!(self, Affordance::Join)
    }

    pub fn can_leave(&self) -> bool {
        matches!(self, Affordance::Leave)
    }
}

/// First project in `directory`, other than `excluding`, that lists the user
pub fn other_membership<'a>(directory: &'a [Project], user_id: Id, excluding: Id) -> Option<&'a Project> {
    directory
        .iter()
        .find(|p| p.id != excluding && p.has_member(user_id))
}

/// Decide what `user` may do with `project`, given the cached directory
pub fn affordance(user: &User, project: &Project, directory: &[Project]) -> Affordance {
    if Membership::of(project, user) == Membership::Member {
        return Affordance::Leave;
    }
    if !user.is_student() {
        return Affordance::Unavailable(JoinBlock::NotStudent);
    }
    if project.is_full() {
        return Affordance::Unavailable(JoinBlock::Full);
    }
    if let Some(other) = other_membership(directory, user.id, project.id) {
        return Affordance::Unavailable(JoinBlock::MemberElsewhere {
            project_id: other.id,
            project_name: other.name.clone(),
        });
    }
    Affordance::Join
}

/// Directory entries whose team list contains the user
pub fn projects_of<'a>(directory: &'a [Project], user_id: Id) -> Vec<&'a Project> {
    directory.iter().filter(|p| p.has_member(user_id)).collect()
}
