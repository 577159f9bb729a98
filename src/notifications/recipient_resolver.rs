use std::collections::HashSet;

/// Union role-matched users with group members, deduplicated in first-seen
/// order. A user reached through several roles or groups still receives
/// exactly one notification.
pub fn resolve_recipients(role_users: Vec<String>, group_members: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    role_users
        .into_iter()
        .chain(group_members)
        .filter(|user_id| seen.insert(user_id.clone()))
        .collect()
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Resolution never yields duplicates and never invents a user id.
    #[test]
    fn prop_resolution_is_deduplicated_subset() {
        proptest!(|(
            role_users in prop::collection::vec("[a-z][0-9]{1,2}", 0..10),
            group_members in prop::collection::vec("[a-z][0-9]{1,2}", 0..10)
        )| {
            let recipients =
                resolve_recipients(role_users.clone(), group_members.clone());

            let unique: std::collections::HashSet<&String> = recipients.iter().collect();
            prop_assert_eq!(unique.len(), recipients.len());

            for user_id in &recipients {
                prop_assert!(
                    role_users.contains(user_id) || group_members.contains(user_id)
                );
            }

            for user_id in role_users.iter().chain(group_members.iter()) {
                prop_assert!(recipients.contains(user_id));
            }
        });
    }
}
