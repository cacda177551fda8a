#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Admin = 1,
    HrOfficer = 2,
    PayrollOfficer = 3,
    Manager = 4,
    Employee = 5,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::HrOfficer),
            3 => Some(Role::PayrollOfficer),
            4 => Some(Role::Manager),
            5 => Some(Role::Employee),
            _ => None,
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ids_map_to_known_roles() {
        assert_eq!(Role::from_id(1), Some(Role::Admin));
        assert_eq!(Role::from_id(2), Some(Role::HrOfficer));
        assert_eq!(Role::from_id(3), Some(Role::PayrollOfficer));
        assert_eq!(Role::from_id(4), Some(Role::Manager));
        assert_eq!(Role::from_id(5), Some(Role::Employee));
        assert!(Role::from_id(0).is_none());
        assert!(Role::from_id(6).is_none());
    }
}
