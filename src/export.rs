//! Submission export: assemble, render, name, and write the document

use crate::document::{AssembleError, Assembler, DocDefinition};
use crate::form_data::FormData;
use crate::render::{DocumentRenderer, RenderError};
use crate::schema::{Currency, FormSchema, SchemaError};
use chrono::{DateTime, Local, NaiveDate, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_FILE_PREFIX: &str = "SPI_Reimbursement_Request";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Assemble(#[from] AssembleError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Currency(#[from] SchemaError),

    #[error("'{0}' is not a date (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, which is taken in UTC
pub fn normalize_date(raw: &str) -> Result<NaiveDate, ExportError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|d| d.with_timezone(&Utc).date_naive()))
        .map_err(|_| ExportError::InvalidDate(raw.to_string()))
}

/// `<prefix>_<YYYY-MM-DD>.<extension>`
pub fn output_file_name(prefix: &str, date: NaiveDate, extension: &str) -> String {
    format!("{prefix}_{}.{extension}", date.format("%Y-%m-%d"))
}

/// Date used for the file name: `meta.date`, or today when it was left out
fn submission_date(data: &FormData) -> Result<NaiveDate, ExportError> {
    match data.field("meta", "date").and_then(|v| v.as_str()) {
        Some(raw) if !raw.trim().is_empty() => normalize_date(raw),
        _ => {
            tracing::debug!("submission has no date, naming file after today");
            Ok(Local::now().date_naive())
        }
    }
}

/// `curr.currency` as a supported code; None when it was left out, which the
/// assembler reports as a missing discriminator
fn submission_currency(data: &FormData) -> Result<Option<Currency>, ExportError> {
    let Some(code) = data.field("curr", "currency").and_then(|v| v.as_str()) else {
        return Ok(None);
    };
    let currency = code.parse::<Currency>().inspect_err(|e| {
        tracing::warn!(error = %e, "submission names an unsupported currency");
    })?;
    Ok(Some(currency))
}

pub struct Exporter<R: DocumentRenderer> {
    renderer: R,
    output_dir: PathBuf,
    prefix: String,
}

impl<R: DocumentRenderer> Exporter<R> {
    pub fn new(renderer: R, output_dir: impl Into<PathBuf>, prefix: &str) -> Self {
        Self {
            renderer,
            output_dir: output_dir.into(),
            prefix: prefix.to_string(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Build the file name and rendered bytes without touching the disk.
    /// Nothing is rendered when the currency is unsupported or the submission
    /// cannot be assembled.
    pub fn prepare(
        &self,
        schema: &FormSchema,
        data: &FormData,
    ) -> Result<(String, Vec<u8>), ExportError> {
        if let Some(currency) = submission_currency(data)? {
            tracing::debug!(currency = %currency, "submission currency");
        }
        let model = Assembler::new(schema).assemble(data).inspect_err(|e| {
            tracing::warn!(error = %e, "submission could not be assembled");
        })?;
        let date = submission_date(data)?;

        let definition = DocDefinition::from_model(&model);
        let bytes = self.renderer.render(&definition)?;
        let name = output_file_name(&self.prefix, date, self.renderer.extension());

        tracing::debug!(file = %name, bytes = bytes.len(), "rendered document");
        Ok((name, bytes))
    }

    /// Render the submission and write it into the output directory
    pub fn export(&self, schema: &FormSchema, data: &FormData) -> Result<PathBuf, ExportError> {
        tracing::info!("exporting submission");
        let (name, bytes) = self.prepare(schema, data)?;

        fs::create_dir_all(&self.output_dir).map_err(|source| ExportError::Io {
            path: self.output_dir.clone(),
            source,
        })?;
        let path = self.output_dir.join(name);
        fs::write(&path, bytes).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::info!(path = %path.display(), "wrote document");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MockDocumentRenderer;
    use crate::schema::{Branch, Dependency, FieldDescriptor, Section};

    fn schema() -> FormSchema {
        FormSchema::reimbursement().unwrap()
    }

    fn submission() -> FormData {
        let mut data = FormData::new();
        data.set("meta", "project", "Debian");
        data.set("meta", "date", "2024-03-09");
        data.set("meta", "name", "Jane Doe");
        data.set("meta", "email", "jane@example.org");
        data.set("curr", "amount", 120.5);
        data.set("curr", "currency", "EUR");
        data.set("curr", "iban", "DE89370400440532013000");
        data
    }

    fn mock_renderer() -> MockDocumentRenderer {
        let mut renderer = MockDocumentRenderer::new();
        renderer
            .expect_render()
            .returning(|_| Ok(b"%PDF-mock".to_vec()));
        renderer.expect_extension().return_const("pdf");
        renderer
    }

    mod dates {
        use super::*;

        #[test]
        fn test_plain_date() {
            assert_eq!(
                normalize_date("2024-03-09").unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
            );
        }

        #[test]
        fn test_rfc3339_is_taken_in_utc() {
            assert_eq!(
                normalize_date("2024-03-09T23:30:00-02:00").unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
            );
        }

        #[test]
        fn test_invalid_date() {
            assert!(matches!(
                normalize_date("09/03/2024"),
                Err(ExportError::InvalidDate(raw)) if raw == "09/03/2024"
            ));
        }

        #[test]
        fn test_output_file_name() {
            let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
            assert_eq!(
                output_file_name(DEFAULT_FILE_PREFIX, date, "pdf"),
                "SPI_Reimbursement_Request_2024-01-02.pdf"
            );
        }
    }

    mod exporter {
        use super::*;

        #[test]
        fn test_prepare_names_file_after_submission_date() {
            let exporter = Exporter::new(mock_renderer(), ".", DEFAULT_FILE_PREFIX);
            let (name, bytes) = exporter.prepare(&schema(), &submission()).unwrap();
            assert_eq!(name, "SPI_Reimbursement_Request_2024-03-09.pdf");
            assert_eq!(bytes, b"%PDF-mock".to_vec());
        }

        #[test]
        fn test_renderer_receives_assembled_definition() {
            let mut renderer = MockDocumentRenderer::new();
            renderer
                .expect_render()
                .withf(|definition| definition.title() == Some("SPI Reimbursement Request"))
                .times(1)
                .returning(|_| Ok(Vec::new()));
            renderer.expect_extension().return_const("pdf");

            let exporter = Exporter::new(renderer, ".", "Out");
            exporter.prepare(&schema(), &submission()).unwrap();
        }

        #[test]
        fn test_unknown_currency_renders_nothing() {
            let mut renderer = MockDocumentRenderer::new();
            renderer.expect_render().times(0);
            renderer.expect_extension().times(0);

            let mut data = submission();
            data.set("curr", "currency", "XXX");

            let exporter = Exporter::new(renderer, ".", DEFAULT_FILE_PREFIX);
            let result = exporter.prepare(&schema(), &data);
            assert!(matches!(
                result,
                Err(ExportError::Currency(SchemaError::UnknownCurrency(code))) if code == "XXX"
            ));
        }

        #[test]
        fn test_supported_currency_without_branch_is_unresolved() {
            let mut renderer = MockDocumentRenderer::new();
            renderer.expect_render().times(0);

            let schema = FormSchema::new(
                "Narrow",
                vec![Section::new("curr", "currency")
                    .required(FieldDescriptor::plain_choice("currency", "Currency", &["EUR"]))
                    .with_dependency(Dependency::new(
                        "currency",
                        vec![Branch::new("EUR").required(FieldDescriptor::text("iban", "IBAN"))],
                    ))],
            )
            .unwrap();
            let mut data = FormData::new();
            data.set("curr", "currency", "GBP");

            let exporter = Exporter::new(renderer, ".", DEFAULT_FILE_PREFIX);
            assert!(matches!(
                exporter.prepare(&schema, &data),
                Err(ExportError::Assemble(AssembleError::UnresolvedBranch { value, .. })) if value == "GBP"
            ));
        }

        #[test]
        fn test_missing_discriminator_renders_nothing() {
            let mut renderer = MockDocumentRenderer::new();
            renderer.expect_render().times(0);

            let mut data = FormData::new();
            data.set("meta", "date", "2024-03-09");

            let exporter = Exporter::new(renderer, ".", DEFAULT_FILE_PREFIX);
            assert!(matches!(
                exporter.prepare(&schema(), &data),
                Err(ExportError::Assemble(
                    AssembleError::MissingDiscriminator { .. }
                ))
            ));
        }

        #[test]
        fn test_render_failure_is_reported() {
            let mut renderer = MockDocumentRenderer::new();
            renderer
                .expect_render()
                .returning(|_| Err(RenderError::Empty));

            let exporter = Exporter::new(renderer, ".", DEFAULT_FILE_PREFIX);
            assert!(matches!(
                exporter.prepare(&schema(), &submission()),
                Err(ExportError::Render(RenderError::Empty))
            ));
        }

        #[test]
        fn test_export_writes_into_output_dir() {
            let dir = tempfile::tempdir().unwrap();
            let output = dir.path().join("nested");
            let exporter = Exporter::new(mock_renderer(), &output, "Claim");

            let path = exporter.export(&schema(), &submission()).unwrap();
            assert_eq!(path, output.join("Claim_2024-03-09.pdf"));
            assert_eq!(fs::read(&path).unwrap(), b"%PDF-mock".to_vec());
        }

        #[test]
        fn test_export_with_real_renderer() {
            let dir = tempfile::tempdir().unwrap();
            let exporter = Exporter::new(
                crate::render::PdfRenderer::default(),
                dir.path(),
                DEFAULT_FILE_PREFIX,
            );

            let path = exporter.export(&schema(), &submission()).unwrap();
            let bytes = fs::read(path).unwrap();
            assert!(bytes.starts_with(b"%PDF"));
        }
    }
}
