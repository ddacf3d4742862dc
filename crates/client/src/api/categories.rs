use api_types::{CategoryType, category::Category};

use crate::{error::Result, gateway::Gateway};

pub struct CategoriesApi<'a> {
    gateway: &'a Gateway,
}

impl<'a> CategoriesApi<'a> {
    pub(crate) fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        self.gateway.get("category").await
    }
}

/// Categories of one type, in server order.
pub fn of_type(categories: &[Category], kind: CategoryType) -> impl Iterator<Item = &Category> {
    categories.iter().filter(move |c| c.kind == kind)
}

/// Turns a server enum name such as `FOOD_AND_BEVERAGES` into
/// `Food And Beverages`. Names that are not upper snake case are kept.
pub fn display_name(name: &str) -> String {
    let is_enum_name = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
    if !is_enum_name {
        return name.to_string();
    }

    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_string() + &chars.as_str().to_ascii_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
