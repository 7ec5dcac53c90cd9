use fedgate_shared::{ClassType, FieldMap, LogicalTime};

/// Interactions under this class carry federation bookkeeping parameters
pub const C2W_INTERACTION_ROOT: &str = "InteractionRoot.C2WInteractionRoot";

pub struct RewriteContext<'a> {
    pub federate_name: &'a str,
    pub logical_time: LogicalTime,
}

/// Adjusts an outgoing interaction's fields right before they are encoded
pub trait InteractionRewriter {
    fn rewrite(&self, class: &ClassType, fields: &mut FieldMap, context: &RewriteContext<'_>);
}

/// Fills in the sender, origin and generation-time parameters that
/// interactions of the `C2WInteractionRoot` family carry. Other interactions
/// pass through untouched, and only parameters the class declares are set.
#[derive(Clone, Copy, Debug, Default)]
pub struct C2wBookkeeping;

impl InteractionRewriter for C2wBookkeeping {
    fn rewrite(&self, class: &ClassType, fields: &mut FieldMap, context: &RewriteContext<'_>) {
        if !class.is_within(C2W_INTERACTION_ROOT) {
            return;
        }
        if class.has_field("sourceFed") {
            fields.insert("sourceFed".to_string(), context.federate_name.to_string());
        }
        if class.has_field("originFed") && !fields.contains_key("originFed") {
            fields.insert("originFed".to_string(), context.federate_name.to_string());
        }
        if class.has_field("actualLogicalGenerationTime") {
            fields.insert(
                "actualLogicalGenerationTime".to_string(),
                context.logical_time.to_string(),
            );
        }
    }
}
