//! Team member choice values.

use crate::define_choice_enum;

/// Maximum length of a team member name.
pub const MAX_MEMBER_NAME_LENGTH: usize = 255;

/// Maximum length of a department label.
pub const MAX_DEPARTMENT_LENGTH: usize = 128;

define_choice_enum! {
    /// Role a team member plays.
    TeamRole ("team role") {
        Employee = "Employee",
        ScrumMaster = "Scrum Master",
        Manager = "Manager",
    }
}

define_choice_enum! {
    /// Whether a team member is currently active.
    MemberStatus ("member status") {
        Active = "Active",
        Inactive = "Inactive",
    }
}

impl Default for TeamRole {
    fn default() -> Self {
        Self::Employee
    }
}

impl Default for MemberStatus {
    fn default() -> Self {
        Self::Active
    }
}
