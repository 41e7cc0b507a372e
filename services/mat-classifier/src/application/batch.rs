//! CSV 批量导入

use chrono::Utc;
use csv::{ReaderBuilder, StringRecord, Trim};
use matc_errors::{AppError, AppResult};

use super::handler::ProcessedMaterial;
use crate::domain::entities::MaterialInput;

/// CSV 列，顺序即模板顺序
pub const CSV_COLUMNS: [&str; 10] = [
    "materialName",
    "materialType",
    "materialId",
    "basicDescription",
    "technicalSpecs",
    "manufacturer",
    "modelNumber",
    "primaryGroup",
    "secondaryGroup",
    "tertiaryGroup",
];

const TEMPLATE_SAMPLE_ROW: &str = "AC Motor,spare,10001,\"3-phase, 15kW, 400V, IP55, foot-mounted\",\"50Hz, Class F insulation\",ABB,M3BP160MLA4,electrical,motor,ac_motor";

/// 模板文件：表头 + 一行示例
pub fn csv_template() -> String {
    format!("{}\n{}\n", CSV_COLUMNS.join(","), TEMPLATE_SAMPLE_ROW)
}

/// CSV 一行的原始内容，缺失的列为空串
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvRow {
    pub material_name: String,
    pub material_type: String,
    pub material_id: String,
    pub basic_description: String,
    pub technical_specs: String,
    pub manufacturer: String,
    pub model_number: String,
    pub primary_group: String,
    pub secondary_group: String,
    pub tertiary_group: String,
}

impl CsvRow {
    pub fn to_input(&self) -> MaterialInput {
        MaterialInput {
            material_id: Some(self.material_id.clone()),
            material_name: self.material_name.clone(),
            material_type: self.material_type.clone(),
            basic_description: self.basic_description.clone(),
            technical_specs: Some(self.technical_specs.clone()),
            manufacturer: Some(self.manufacturer.clone()),
            model_number: Some(self.model_number.clone()),
            primary_group: self.primary_group.clone(),
            secondary_group: Some(self.secondary_group.clone()),
            tertiary_group: Some(self.tertiary_group.clone()),
        }
        .normalized()
    }
}

/// 按表头名称取列，缺失的列视为空
struct ColumnIndex {
    headers: StringRecord,
}

impl ColumnIndex {
    fn get(&self, fields: &[String], column: &str) -> String {
        self.headers
            .iter()
            .position(|h| h == column)
            .and_then(|i| fields.get(i))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    fn row(&self, fields: &[String]) -> CsvRow {
        CsvRow {
            material_name: self.get(fields, "materialName"),
            material_type: self.get(fields, "materialType"),
            material_id: self.get(fields, "materialId"),
            basic_description: self.get(fields, "basicDescription"),
            technical_specs: self.get(fields, "technicalSpecs"),
            manufacturer: self.get(fields, "manufacturer"),
            model_number: self.get(fields, "modelNumber"),
            primary_group: self.get(fields, "primaryGroup"),
            secondary_group: self.get(fields, "secondaryGroup"),
            tertiary_group: self.get(fields, "tertiaryGroup"),
        }
    }
}

/// 解码后的一行
///
/// 无法解码的行 `material` 为错误信息，`content` 保留有损转换后的原始内容
#[derive(Debug)]
pub struct DecodedRow {
    /// 数据行序号，从 1 开始
    pub row: usize,
    pub content: CsvRow,
    pub material: Result<MaterialInput, String>,
}

/// 解码整个 CSV
///
/// 表头无法读取或不含任何已知列时返回 `Validation`；单行错误保留在结果中
pub fn decode_csv(bytes: &[u8]) -> AppResult<Vec<DecodedRow>> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    let mut reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| AppError::validation(format!("Unreadable CSV header: {}", e)))?;
    if headers.iter().all(|h| h.is_empty()) {
        return Err(AppError::validation("CSV file is empty"));
    }
    if !headers.iter().any(|h| CSV_COLUMNS.contains(&h)) {
        return Err(AppError::validation(format!(
            "CSV header contains none of the expected columns: {}",
            CSV_COLUMNS.join(",")
        )));
    }

    let columns = ColumnIndex {
        headers: headers.clone(),
    };

    Ok(reader
        .byte_records()
        .enumerate()
        .map(|(i, record)| {
            let row = i + 1;
            match record {
                Ok(record) => {
                    let fields: Vec<String> = record
                        .iter()
                        .map(|f| String::from_utf8_lossy(f).into_owned())
                        .collect();
                    let content = columns.row(&fields);
                    let material = match StringRecord::from_byte_record(record) {
                        Ok(_) => Ok(content.to_input()),
                        Err(e) => Err(format!("Failed to decode row: {}", e.utf8_error())),
                    };
                    DecodedRow {
                        row,
                        content,
                        material,
                    }
                }
                Err(e) => DecodedRow {
                    row,
                    content: CsvRow::default(),
                    material: Err(format!("Failed to decode row: {}", e)),
                },
            }
        })
        .collect())
}

/// 以当前 Unix 毫秒时间作为批次号
pub fn new_batch_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

/// 单行失败
#[derive(Debug, Clone)]
pub struct BatchRowError {
    /// 数据行序号，从 1 开始
    pub row_number: usize,
    /// 失败行的原始内容
    pub row: CsvRow,
    pub error: String,
}

/// 批量处理结果
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub batch_id: String,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<ProcessedMaterial>,
    pub errors: Vec<BatchRowError>,
}

impl BatchOutcome {
    pub fn new(batch_id: String) -> Self {
        Self {
            batch_id,
            successful: 0,
            failed: 0,
            results: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.successful + self.failed
    }

    pub fn record_success(&mut self, processed: ProcessedMaterial) {
        self.successful += 1;
        self.results.push(processed);
    }

    pub fn record_failure(&mut self, error: BatchRowError) {
        self.failed += 1;
        self.errors.push(error);
    }
}
