use crate::permissions::types::policy::{
    AccessArgs, AccessRule, ResolvedFieldAccessControl, ResolvedListAccessControl,
};
use crate::{log_access_debug, log_access_warn};

/// Evaluates normalized access rules.
///
/// Rules are either fixed answers or predicates that may suspend (for example
/// to look something up in the store). A suspended check only holds up the
/// field or list it gates.
#[derive(Debug, Default, Clone)]
pub struct PermissionManager {}

impl PermissionManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates a single field-level rule.
    pub async fn validate_field_access(&self, rule: &AccessRule, args: AccessArgs) -> bool {
        let list_key = args.list_key.clone();
        let field_key = args.field_key.clone().unwrap_or_default();
        let operation = args.operation;

        let allowed = rule.evaluate(args).await;
        if allowed {
            log_access_debug!(
                "FIELD ACCESS: {}.{} {} - granted",
                list_key,
                field_key,
                operation
            );
        } else {
            log_access_warn!(
                "FIELD ACCESS: {}.{} {} - ACCESS DENIED",
                list_key,
                field_key,
                operation
            );
        }
        allowed
    }

    /// Evaluates the field rule for `args.operation`. Operations a field has
    /// no gate for (delete) are allowed here and decided at list level.
    pub async fn check_field_operation(
        &self,
        access: &ResolvedFieldAccessControl,
        args: AccessArgs,
    ) -> bool {
        match access.rule(args.operation) {
            Some(rule) => self.validate_field_access(rule, args).await,
            None => true,
        }
    }

    /// Evaluates the list rule for `args.operation`.
    pub async fn check_list_operation(
        &self,
        access: &ResolvedListAccessControl,
        args: AccessArgs,
    ) -> bool {
        let list_key = args.list_key.clone();
        let operation = args.operation;

        let allowed = access.rule(operation).evaluate(args).await;
        if allowed {
            log_access_debug!("LIST ACCESS: {} {} - granted", list_key, operation);
        } else {
            log_access_warn!("LIST ACCESS: {} {} - ACCESS DENIED", list_key, operation);
        }
        allowed
    }
}
