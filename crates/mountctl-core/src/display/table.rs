use crate::api::models::ProbeResult;
use crate::core::mask::mask_addition;
use crate::store::{Addition, StorageRecord};
use crate::utils::text::truncate_text;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets};
use crossterm::terminal;
use serde_json::{Value, json};

struct ColumnWidths {
    mount_path: usize,
    remark: usize,
    addition: usize,
}

pub struct TableDisplay {
    max_width: Option<usize>,
    use_colors: bool,
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDisplay {
    pub fn new() -> Self {
        Self {
            max_width: Self::detect_terminal_width(),
            use_colors: true,
        }
    }

    fn detect_terminal_width() -> Option<usize> {
        match terminal::size() {
            Ok((cols, _)) => Some((cols as usize).clamp(40, 200)),
            Err(_) => Some(80),
        }
    }

    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn bold_header(&self, text: &str, color: Color) -> Cell {
        if self.use_colors {
            Cell::new(text).add_attribute(Attribute::Bold).fg(color)
        } else {
            Cell::new(text).add_attribute(Attribute::Bold)
        }
    }

    fn colored_cell(&self, text: &str, color: Color) -> Cell {
        if self.use_colors {
            Cell::new(text).fg(color)
        } else {
            Cell::new(text)
        }
    }

    fn new_table(&self, headers: &[&str], color: Color) -> Table {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        let width = self
            .max_width
            .map(|w| if w > 20 { w - 6 } else { w.max(40) })
            .unwrap_or(80);
        table.set_width(width as u16);
        table.set_header(
            headers
                .iter()
                .map(|h| self.bold_header(h, color))
                .collect::<Vec<_>>(),
        );
        table
    }

    fn column_widths(&self) -> ColumnWidths {
        match self.max_width.unwrap_or(80) {
            0..=79 => ColumnWidths {
                mount_path: 12,
                remark: 10,
                addition: 20,
            },
            80..=119 => ColumnWidths {
                mount_path: 16,
                remark: 16,
                addition: 36,
            },
            _ => ColumnWidths {
                mount_path: 24,
                remark: 24,
                addition: 64,
            },
        }
    }

    /// One row per record; sensitive fields masked unless `show_secrets`
    pub fn render_records(&self, records: &[StorageRecord], show_secrets: bool) -> String {
        if records.is_empty() {
            return "No storages configured.".to_string();
        }

        let mut table = self.new_table(
            &["ID", "Mount Path", "Driver", "Status", "Order", "Remark", "Addition"],
            Color::Cyan,
        );
        let widths = self.column_widths();

        for record in records {
            let addition = display_addition(&record.addition, show_secrets);
            let status = if record.disabled {
                format!("{} (disabled)", record.status)
            } else {
                record.status.clone()
            };
            let status_color = if record.disabled {
                Color::DarkGrey
            } else {
                Color::Green
            };

            table.add_row(vec![
                self.colored_cell(&record.id.to_string(), Color::Cyan),
                Cell::new(truncate_text(&record.mount_path, widths.mount_path)),
                Cell::new(&record.driver),
                self.colored_cell(&status, status_color),
                Cell::new(record.order),
                Cell::new(truncate_text(&record.remark, widths.remark)),
                self.colored_cell(
                    &truncate_text(&compact_json(&addition), widths.addition),
                    Color::DarkGrey,
                ),
            ]);
        }

        table.to_string()
    }

    /// Field-by-field view of one record, each `addition` key on its own row
    pub fn render_record_detail(&self, record: &StorageRecord, show_secrets: bool) -> String {
        let mut table = self.new_table(&["Field", "Value"], Color::Cyan);

        table.add_row(vec![Cell::new("id"), Cell::new(record.id)]);
        table.add_row(vec![Cell::new("mount_path"), Cell::new(&record.mount_path)]);
        table.add_row(vec![Cell::new("driver"), Cell::new(&record.driver)]);
        table.add_row(vec![Cell::new("status"), Cell::new(&record.status)]);
        table.add_row(vec![Cell::new("disabled"), Cell::new(record.disabled)]);
        table.add_row(vec![Cell::new("order"), Cell::new(record.order)]);
        table.add_row(vec![Cell::new("remark"), Cell::new(&record.remark)]);

        for (key, value) in display_addition(&record.addition, show_secrets) {
            let text = match &value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            table.add_row(vec![
                self.colored_cell(&format!("addition.{}", key), Color::DarkGrey),
                Cell::new(text),
            ]);
        }

        table.to_string()
    }

    /// Driver tags alongside the `addition` key holding their credential
    pub fn render_drivers(&self, drivers: &[(&str, Option<&str>)]) -> String {
        let mut table = self.new_table(&["Driver", "Credential Key"], Color::Green);
        for (driver, credential_key) in drivers {
            table.add_row(vec![
                Cell::new(driver),
                Cell::new(credential_key.unwrap_or("-")),
            ]);
        }
        table.to_string()
    }

    pub fn render_probe_results(&self, results: &[ProbeResult]) -> String {
        let mut table = self.new_table(&["Endpoint", "HTTP", "Code", "Message"], Color::Yellow);
        for result in results {
            let color = if result.is_authorized() {
                Color::Green
            } else {
                Color::Red
            };
            table.add_row(vec![
                Cell::new(&result.endpoint),
                self.colored_cell(&result.http_status.to_string(), color),
                Cell::new(
                    result
                        .code
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::new(result.message.as_deref().unwrap_or("-")),
            ]);
        }
        table.to_string()
    }
}

fn display_addition(addition: &Addition, show_secrets: bool) -> Addition {
    if show_secrets {
        addition.clone()
    } else {
        mask_addition(addition)
    }
}

fn compact_json(addition: &Addition) -> String {
    serde_json::to_string(addition).unwrap_or_else(|_| "{}".to_string())
}

/// JSON form of records for `--format json`
pub fn records_to_json(records: &[StorageRecord], show_secrets: bool) -> Value {
    Value::Array(
        records
            .iter()
            .map(|record| {
                json!({
                    "id": record.id,
                    "mount_path": record.mount_path,
                    "driver": record.driver,
                    "addition": display_addition(&record.addition, show_secrets),
                    "status": record.status,
                    "disabled": record.disabled,
                    "remark": record.remark,
                    "order": record.order,
                })
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mask::REDACTED;

    fn webdav() -> StorageRecord {
        StorageRecord {
            id: 3,
            mount_path: "/demo".to_string(),
            driver: "Webdav".to_string(),
            addition: json!({"url": "https://x", "username": "u", "password": "p"})
                .as_object()
                .cloned()
                .expect("object"),
            status: "work".to_string(),
            disabled: false,
            remark: "WebDAV示例".to_string(),
            order: 2,
        }
    }

    fn display() -> TableDisplay {
        TableDisplay::new().with_colors(false).with_max_width(160)
    }

    #[test]
    fn test_render_records_masks_by_default() {
        let output = display().render_records(&[webdav()], false);
        assert!(output.contains("/demo"));
        assert!(output.contains("Webdav"));
        assert!(output.contains(REDACTED));
        assert!(!output.contains("\"p\""));
    }

    #[test]
    fn test_render_records_show_secrets() {
        let output = display().render_records(&[webdav()], true);
        assert!(output.contains("\"password\":\"p\""));
    }

    #[test]
    fn test_render_records_empty() {
        assert_eq!(display().render_records(&[], false), "No storages configured.");
    }

    #[test]
    fn test_render_record_detail() {
        let output = display().render_record_detail(&webdav(), false);
        assert!(output.contains("addition.url"));
        assert!(output.contains("https://x"));
        assert!(output.contains("addition.password"));
        assert!(output.contains(REDACTED));
    }

    #[test]
    fn test_records_to_json() {
        let masked = records_to_json(&[webdav()], false);
        assert_eq!(masked[0]["addition"]["password"], json!(REDACTED));
        assert_eq!(masked[0]["addition"]["username"], json!("u"));
        assert_eq!(masked[0]["order"], json!(2));

        let plain = records_to_json(&[webdav()], true);
        assert_eq!(plain[0]["addition"]["password"], json!("p"));
    }

    #[test]
    fn test_render_drivers() {
        let output = display().render_drivers(&[("Quark", Some("cookie")), ("Alias", None)]);
        assert!(output.contains("Quark"));
        assert!(output.contains("cookie"));
        assert!(output.contains("Alias"));
    }

    #[test]
    fn test_render_probe_results() {
        let output = display().render_probe_results(&[ProbeResult {
            endpoint: "/api/me".to_string(),
            http_status: 200,
            code: Some(401),
            message: Some("token is expired".to_string()),
        }]);
        assert!(output.contains("/api/me"));
        assert!(output.contains("401"));
        assert!(output.contains("token is expired"));
    }
}
