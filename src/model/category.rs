use serde::{Deserialize, Serialize};

/// The categories offered when an expense is entered by hand.
///
/// Imported files may carry any category text, so `Expense` stores the category as a `String`
/// and this enum only exists to constrain manual entry.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Utilities,
    #[default]
    Other,
}

serde_plain::derive_display_from_serialize!(Category);
serde_plain::derive_fromstr_from_deserialize!(Category);

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Utilities,
        Category::Other,
    ];
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.to_string()
    }
}
