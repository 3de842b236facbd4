/// Identity of the signed-in business owner performing reviews. Constructed
/// explicitly and passed into every component that needs it; nothing in this
/// workspace reads reviewer identity from ambient state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewerSession {
    pub user_id: String,
    pub display_name: String,
}

impl ReviewerSession {
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), display_name: display_name.into() }
    }
}
