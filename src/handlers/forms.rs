use serde::Deserialize;
use uuid::Uuid;

use crate::handlers::queries::MaterialFilter;
use crate::models::Condition;

/// Material form payload. Numeric fields arrive as strings so a bad value
/// becomes a validation error instead of a rejected request.
#[derive(Debug, Deserialize)]
pub struct MaterialForm {
    pub name: String,
    pub description: String,
    pub quantity: String,
    pub location: String,
    pub condition: Option<String>,
}

#[derive(Debug)]
pub struct MaterialInput {
    pub name: String,
    pub description: String,
    pub quantity: i32,
    pub location_id: Uuid,
    pub condition: Condition,
}

pub fn validate_material_form(form: &MaterialForm) -> Result<MaterialInput, String> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err("Name is required".to_string());
    }
    let description = form.description.trim();
    if description.is_empty() {
        return Err("Description is required".to_string());
    }
    // Negative quantities pass through; the store does not constrain them.
    let quantity = form
        .quantity
        .trim()
        .parse::<i32>()
        .map_err(|_| "Quantity must be a whole number".to_string())?;
    let location_id = Uuid::parse_str(form.location.trim())
        .map_err(|_| "Select a valid location".to_string())?;
    let condition = Condition::parse(form.condition.as_deref().unwrap_or("").trim())
        .ok_or_else(|| "Unknown condition".to_string())?;

    Ok(MaterialInput {
        name: name.to_string(),
        description: description.to_string(),
        quantity,
        location_id,
        condition,
    })
}

#[derive(Debug, Deserialize)]
pub struct LocationForm {
    pub name: String,
    pub max_capacity: String,
}

#[derive(Debug)]
pub struct LocationInput {
    pub name: String,
    pub max_capacity: i32,
}

pub fn validate_location_form(form: &LocationForm) -> Result<LocationInput, String> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err("Name is required".to_string());
    }
    // Empty capacity takes the data-model default; there is no lower bound.
    let capacity_raw = form.max_capacity.trim();
    let max_capacity = if capacity_raw.is_empty() {
        100
    } else {
        capacity_raw
            .parse::<i32>()
            .map_err(|_| "Max capacity must be a whole number".to_string())?
    };

    Ok(LocationInput {
        name: name.to_string(),
        max_capacity,
    })
}

/// Search parameters shared by the role views: optional exact location and
/// case-insensitive name substring. An unparseable location id invalidates
/// the whole search, leaving the list unfiltered.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub location: Option<String>,
    pub name: Option<String>,
}

impl SearchParams {
    pub fn filter(&self) -> MaterialFilter {
        let location_id = match self.location.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match Uuid::parse_str(raw) {
                Ok(id) => Some(id),
                Err(_) => return MaterialFilter::default(),
            },
        };
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        MaterialFilter { location_id, name }
    }

    pub fn values(&self) -> SearchValues {
        SearchValues {
            location_id: self.location.clone().unwrap_or_default(),
            name: self.name.clone().unwrap_or_default(),
        }
    }
}

/// Echoed search inputs for re-rendering the search form.
#[derive(Debug, Default)]
pub struct SearchValues {
    pub location_id: String,
    pub name: String,
}

/// Echoed material form state: blank, pre-filled for editing, or the
/// submitted values when validation failed.
#[derive(Debug, Default)]
pub struct MaterialFormValues {
    pub id: String,
    pub name: String,
    pub description: String,
    pub quantity: String,
    pub location_id: String,
    pub condition: String,
}

impl MaterialFormValues {
    pub fn from_form(form: &MaterialForm, id: Option<Uuid>) -> Self {
        Self {
            id: id.map(|id| id.to_string()).unwrap_or_default(),
            name: form.name.clone(),
            description: form.description.clone(),
            quantity: form.quantity.clone(),
            location_id: form.location.clone(),
            condition: form.condition.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default)]
pub struct LocationFormValues {
    pub id: String,
    pub name: String,
    pub max_capacity: String,
}

impl LocationFormValues {
    pub fn from_form(form: &LocationForm, id: Option<Uuid>) -> Self {
        Self {
            id: id.map(|id| id.to_string()).unwrap_or_default(),
            name: form.name.clone(),
            max_capacity: form.max_capacity.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material_form(name: &str, quantity: &str, condition: Option<&str>) -> MaterialForm {
        MaterialForm {
            name: name.to_string(),
            description: "M8 hex bolts".to_string(),
            quantity: quantity.to_string(),
            location: "5f8a1f2e-0000-0000-0000-000000000001".to_string(),
            condition: condition.map(str::to_string),
        }
    }

    #[test]
    fn valid_material_form_passes_through() {
        let input = validate_material_form(&material_form("Bolt", "5", Some("Used"))).unwrap();
        assert_eq!(input.name, "Bolt");
        assert_eq!(input.quantity, 5);
        assert_eq!(input.condition, Condition::Used);
    }

    #[test]
    fn missing_condition_defaults_to_new() {
        let input = validate_material_form(&material_form("Bolt", "5", None)).unwrap();
        assert_eq!(input.condition, Condition::New);
    }

    #[test]
    fn negative_quantity_is_accepted() {
        let input = validate_material_form(&material_form("Bolt", "-3", None)).unwrap();
        assert_eq!(input.quantity, -3);
    }

    #[test]
    fn material_form_rejects_bad_fields() {
        assert!(validate_material_form(&material_form("", "5", None)).is_err());
        assert!(validate_material_form(&material_form("Bolt", "five", None)).is_err());
        assert!(validate_material_form(&material_form("Bolt", "5", Some("Broken"))).is_err());

        let mut form = material_form("Bolt", "5", None);
        form.location = "not-a-uuid".to_string();
        assert!(validate_material_form(&form).is_err());
    }

    #[test]
    fn location_form_defaults_capacity_when_blank() {
        let form = LocationForm {
            name: "Aisle 3".to_string(),
            max_capacity: "".to_string(),
        };
        let input = validate_location_form(&form).unwrap();
        assert_eq!(input.max_capacity, 100);
    }

    #[test]
    fn location_form_allows_negative_capacity() {
        let form = LocationForm {
            name: "Aisle 3".to_string(),
            max_capacity: "-10".to_string(),
        };
        assert_eq!(validate_location_form(&form).unwrap().max_capacity, -10);
    }

    #[test]
    fn location_form_rejects_bad_input() {
        let blank_name = LocationForm {
            name: "  ".to_string(),
            max_capacity: "100".to_string(),
        };
        assert!(validate_location_form(&blank_name).is_err());

        let bad_capacity = LocationForm {
            name: "Aisle 3".to_string(),
            max_capacity: "lots".to_string(),
        };
        assert!(validate_location_form(&bad_capacity).is_err());
    }

    #[test]
    fn search_params_trim_and_invalidate() {
        let search = SearchParams {
            location: Some("5f8a1f2e-0000-0000-0000-000000000001".to_string()),
            name: Some("  bolt ".to_string()),
        };
        let filter = search.filter();
        assert!(filter.location_id.is_some());
        assert_eq!(filter.name.as_deref(), Some("bolt"));

        let invalid = SearchParams {
            location: Some("garbage".to_string()),
            name: Some("bolt".to_string()),
        };
        assert!(invalid.filter().is_empty());

        assert!(SearchParams::default().filter().is_empty());
    }
}
