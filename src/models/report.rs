use serde::{Deserialize, Serialize};

use crate::models::MaterialDisplay;

/// Closed set of report tags submitted from the report forms. Unknown tags
/// collapse into the default `Inventory` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    Category,
    InventoryStatus,
    Historical,
    Specific,
    Movements,
    Inventory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportShape {
    /// Materials grouped by name with a summed quantity per group.
    Grouped,
    /// The unfiltered full material list.
    Flat,
}

impl ReportType {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "category" => ReportType::Category,
            "inventory_status" => ReportType::InventoryStatus,
            "historical" => ReportType::Historical,
            "specific" => ReportType::Specific,
            "movements" => ReportType::Movements,
            _ => ReportType::Inventory,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ReportType::Category => "category",
            ReportType::InventoryStatus => "inventory_status",
            ReportType::Historical => "historical",
            ReportType::Specific => "specific",
            ReportType::Movements => "movements",
            ReportType::Inventory => "inventory",
        }
    }

    pub fn filename(&self) -> String {
        format!("{}_report.csv", self.tag())
    }

    /// Only `category` gets the grouped query; every other tag, recognized
    /// or not, currently aliases the full material list. Known limitation of
    /// the report catalogue, kept as-is.
    pub fn shape(&self) -> ReportShape {
        match self {
            ReportType::Category => ReportShape::Grouped,
            _ => ReportShape::Flat,
        }
    }

    /// Historical and movements exports carry the registration timestamp as
    /// a trailing column; the rest do not.
    pub fn includes_date(&self) -> bool {
        matches!(self, ReportType::Historical | ReportType::Movements)
    }

    pub fn header(&self) -> &'static [&'static str] {
        if self.includes_date() {
            &["Name", "Description", "Quantity", "Location", "Recorded By", "Date Added"]
        } else {
            &["Name", "Description", "Quantity", "Location", "Recorded By"]
        }
    }

    pub fn row(&self, material: &MaterialDisplay) -> Vec<String> {
        let mut row = vec![
            material.name.clone(),
            material.description.clone(),
            material.quantity.to_string(),
            material.location_name.clone(),
            material.added_by_username.clone(),
        ];
        if self.includes_date() {
            row.push(material.date_added.to_string());
        }
        row
    }
}

/// One group of the `category` report.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRow {
    pub name: String,
    pub total_quantity: i64,
}

/// A generated report, as rendered inline on the manager pages.
#[derive(Debug)]
pub enum Report {
    Grouped(Vec<CategoryRow>),
    Flat(Vec<MaterialDisplay>),
}

/// Groups materials by name, summing quantities. Group order is pinned to
/// ascending name order.
pub fn group_by_name(materials: &[MaterialDisplay]) -> Vec<CategoryRow> {
    let mut groups = std::collections::BTreeMap::<&str, i64>::new();
    for material in materials {
        *groups.entry(material.name.as_str()).or_insert(0) += i64::from(material.quantity);
    }
    groups
        .into_iter()
        .map(|(name, total_quantity)| CategoryRow {
            name: name.to_string(),
            total_quantity,
        })
        .collect()
}

/// Serializes a material list as a CSV document for the given report type:
/// header row first, then one row per material in input order.
pub fn write_csv(report_type: ReportType, materials: &[MaterialDisplay]) -> Result<Vec<u8>, csv::Error> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buf);
        writer.write_record(report_type.header())?;
        for material in materials {
            writer.write_record(report_type.row(material))?;
        }
        writer.flush()?;
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn material(name: &str, quantity: i32) -> MaterialDisplay {
        MaterialDisplay {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: format!("{} stock", name),
            quantity,
            condition: "New".to_string(),
            location_id: Uuid::new_v4(),
            location_name: "Aisle 1".to_string(),
            added_by_username: "clerk1".to_string(),
            date_added: Utc.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn unknown_tags_fall_back_to_inventory() {
        assert_eq!(ReportType::parse("category"), ReportType::Category);
        assert_eq!(ReportType::parse("movements"), ReportType::Movements);
        assert_eq!(ReportType::parse(""), ReportType::Inventory);
        assert_eq!(ReportType::parse("weekly"), ReportType::Inventory);
    }

    #[test]
    fn only_category_is_grouped() {
        assert_eq!(ReportType::Category.shape(), ReportShape::Grouped);
        assert_eq!(ReportType::InventoryStatus.shape(), ReportShape::Flat);
        assert_eq!(ReportType::Historical.shape(), ReportShape::Flat);
        assert_eq!(ReportType::Specific.shape(), ReportShape::Flat);
        assert_eq!(ReportType::Movements.shape(), ReportShape::Flat);
        assert_eq!(ReportType::Inventory.shape(), ReportShape::Flat);
    }

    #[test]
    fn filenames_follow_the_tag() {
        assert_eq!(ReportType::Historical.filename(), "historical_report.csv");
        assert_eq!(ReportType::parse("bogus").filename(), "inventory_report.csv");
    }

    #[test]
    fn historical_header_has_six_columns_ending_in_date() {
        let header = ReportType::Historical.header();
        assert_eq!(header.len(), 6);
        assert_eq!(*header.last().unwrap(), "Date Added");
        assert_eq!(ReportType::Movements.header().len(), 6);
    }

    #[test]
    fn category_header_has_five_columns_without_date() {
        let header = ReportType::Category.header();
        assert_eq!(header.len(), 5);
        assert!(!header.contains(&"Date Added"));
        assert_eq!(ReportType::Inventory.header().len(), 5);
    }

    #[test]
    fn row_projection_matches_the_header_width() {
        let m = material("Bolt", 5);
        assert_eq!(ReportType::Historical.row(&m).len(), 6);
        assert_eq!(ReportType::Category.row(&m).len(), 5);
        assert_eq!(ReportType::Historical.row(&m)[5], m.date_added.to_string());
    }

    #[test]
    fn grouping_sums_by_name_in_name_order() {
        let materials = vec![material("Bolt", 5), material("Bolt", 3), material("Nut", 2)];
        let groups = group_by_name(&materials);
        assert_eq!(
            groups,
            vec![
                CategoryRow { name: "Bolt".to_string(), total_quantity: 8 },
                CategoryRow { name: "Nut".to_string(), total_quantity: 2 },
            ]
        );
    }

    #[test]
    fn grouping_empty_input_yields_no_groups() {
        assert!(group_by_name(&[]).is_empty());
    }

    #[test]
    fn grouping_carries_negative_quantities() {
        let materials = vec![material("Bolt", -5), material("Bolt", 3)];
        let groups = group_by_name(&materials);
        assert_eq!(groups[0].total_quantity, -2);
    }

    #[test]
    fn csv_has_header_then_one_row_per_material() {
        let materials = vec![material("Bolt", 5), material("Nut", 2)];
        let bytes = write_csv(ReportType::Category, &materials).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Name,Description,Quantity,Location,Recorded By");
        assert!(lines[1].starts_with("Bolt,Bolt stock,5,"));
        assert!(lines[2].starts_with("Nut,Nut stock,2,"));
    }

    #[test]
    fn csv_historical_rows_end_with_the_timestamp() {
        let m = material("Bolt", 5);
        let stamp = m.date_added.to_string();
        let bytes = write_csv(ReportType::Historical, &[m]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let data_line = text.lines().nth(1).unwrap();
        assert!(data_line.ends_with(&stamp));
    }
}
