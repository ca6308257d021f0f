use serde::{Deserialize, Serialize};

/// An in-stock wine as listed by the catalog service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wine {
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub wine_type: Option<String>,
    pub price: Option<f64>,
}

/// An in-stock cheese as listed by the catalog service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cheese {
    pub id: String,
    pub name: Option<String>,
    pub price: Option<f64>,
}

impl Wine {
    /// Name shown to the model; the id stands in when the catalog has none.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn display_type(&self) -> &str {
        self.wine_type.as_deref().unwrap_or("unknown")
    }

    pub fn display_price(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }
}

impl Cheese {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn display_price(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }
}

#[cfg(test)]
impl Wine {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: Some(name.to_string()),
            wine_type: Some("red".to_string()),
            price: Some(24.5),
        }
    }
}

#[cfg(test)]
impl Cheese {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: Some(name.to_string()),
            price: Some(9.9),
        }
    }
}
