//! Static responder name list.
//!
//! One roster slot per name. Names would come from a personnel system in
//! production; the mock roster keeps them fixed so generation stays
//! deterministic.

pub static MEDIC_NAMES: &[&str] = &[
    "Dr. Amara Okafor",
    "Dr. Elena Petrov",
    "Marcus Webb",
    "Priya Sharma",
    "Dr. Kenji Watanabe",
    "Sofia Reyes",
    "Daniel O'Connor",
    "Leila Haddad",
    "Dr. Omar Farouk",
    "Ingrid Larsen",
    "Dr. Rachel Kim",
    "Tomas Novak",
    "Aisha Bello",
    "Dr. Lucas Moreau",
    "Hana Suzuki",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_size() {
        assert_eq!(MEDIC_NAMES.len(), 15);
    }

    #[test]
    fn test_names_unique_and_nonempty() {
        let unique: std::collections::HashSet<_> = MEDIC_NAMES.iter().collect();
        assert_eq!(unique.len(), MEDIC_NAMES.len());
        assert!(MEDIC_NAMES.iter().all(|n| !n.is_empty()));
    }
}
