/// Editable poster copy. All fields are free-form; blank fields are omitted when drawn.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PosterForm {
    pub brand_name: String,
    pub product_name: String,
    pub tagline: String,
    pub description: String,
    pub cta: String,
    pub price: String,
    pub accent: String,
}

impl Default for PosterForm {
    fn default() -> Self {
        Self {
            brand_name: "Lumen Labs".to_string(),
            product_name: "Aurora Brew Cold Concentrate".to_string(),
            tagline: "Ignite your mornings with luminous energy.".to_string(),
            description: "Triple-steeped coffee enhanced with adaptogens for a smooth, sustained \
                          lift that keeps creatives in flow."
                .to_string(),
            cta: "Launch bundle • Ships today".to_string(),
            price: "$24".to_string(),
            accent: "New Release".to_string(),
        }
    }
}

impl PosterForm {
    /// A form with every field blank.
    pub fn empty() -> Self {
        Self {
            brand_name: String::new(),
            product_name: String::new(),
            tagline: String::new(),
            description: String::new(),
            cta: String::new(),
            price: String::new(),
            accent: String::new(),
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::BrandName => &self.brand_name,
            FormField::ProductName => &self.product_name,
            FormField::Tagline => &self.tagline,
            FormField::Description => &self.description,
            FormField::Cta => &self.cta,
            FormField::Price => &self.price,
            FormField::Accent => &self.accent,
        }
    }

    /// Replace a field; returns whether the value changed.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) -> bool {
        let slot = match field {
            FormField::BrandName => &mut self.brand_name,
            FormField::ProductName => &mut self.product_name,
            FormField::Tagline => &mut self.tagline,
            FormField::Description => &mut self.description,
            FormField::Cta => &mut self.cta,
            FormField::Price => &mut self.price,
            FormField::Accent => &mut self.accent,
        };
        let value = value.into();
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }
}

/// Identifies one editable [`PosterForm`] field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    BrandName,
    ProductName,
    Tagline,
    Description,
    Cta,
    Price,
    Accent,
}

/// Ordered highlight strings whose length always stays within
/// [`BulletList::MIN`]`..=`[`BulletList::MAX`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct BulletList {
    items: Vec<String>,
}

impl BulletList {
    pub const MIN: usize = 2;
    pub const MAX: usize = 5;

    /// Truncate to `MAX` items and pad with blank bullets up to `MIN`.
    pub fn new(items: Vec<String>) -> Self {
        let mut items = items;
        items.truncate(Self::MAX);
        while items.len() < Self::MIN {
            items.push(String::new());
        }
        Self { items }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false`; the list never holds fewer than `MIN` entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a blank bullet unless the list is full.
    pub fn add_bullet(&mut self) -> bool {
        if self.items.len() >= Self::MAX {
            return false;
        }
        self.items.push(String::new());
        true
    }

    /// Remove by index unless the list is at its minimum length or the index is out of range.
    pub fn remove_bullet(&mut self, index: usize) -> bool {
        if self.items.len() <= Self::MIN || index >= self.items.len() {
            return false;
        }
        self.items.remove(index);
        true
    }

    /// Edit by index; out-of-range indices are ignored.
    pub fn update_bullet(&mut self, index: usize, value: impl Into<String>) -> bool {
        let Some(slot) = self.items.get_mut(index) else {
            return false;
        };
        let value = value.into();
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }
}

impl Default for BulletList {
    fn default() -> Self {
        Self::new(vec![
            "Single-origin beans with caramel citrus finish".to_string(),
            "Focus-fueling lion's mane & ginseng".to_string(),
            "Serve chilled over oat milk or tonic".to_string(),
        ])
    }
}

impl From<Vec<String>> for BulletList {
    fn from(items: Vec<String>) -> Self {
        Self::new(items)
    }
}

impl From<BulletList> for Vec<String> {
    fn from(list: BulletList) -> Self {
        list.items
    }
}

#[cfg(test)]
#[path = "../../tests/unit/poster/form.rs"]
mod tests;
