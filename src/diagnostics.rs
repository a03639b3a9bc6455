use crate::language::coarray::message::{Diagnostic as CoarrayDiagnostic, Severity};
use miette::{
    Diagnostic, GraphicalReportHandler, GraphicalTheme, LabeledSpan, NamedSource, Report,
    SourceCode, SourceSpan,
};
use std::{fmt, path::Path};
use thiserror::Error;

/// A checker diagnostic bound to its source text for rendering.
#[derive(Debug, Error, Clone)]
#[error("{message}")]
pub struct CoarrayReport {
    src: NamedSource<String>,
    span: SourceSpan,
    message: String,
    code: Option<&'static str>,
    severity: Severity,
    related: Vec<AttachmentReport>,
}

#[derive(Debug, Error, Diagnostic, Clone)]
#[error("{message}")]
#[diagnostic(severity(Advice))]
pub struct AttachmentReport {
    #[source_code]
    src: NamedSource<String>,
    #[label]
    span: SourceSpan,
    message: String,
}

impl CoarrayReport {
    pub fn from_diagnostic(src: NamedSource<String>, diag: &CoarrayDiagnostic) -> Self {
        let related = diag
            .attachments
            .iter()
            .map(|attachment| AttachmentReport {
                src: src.clone(),
                span: attachment.span.to_source_span(),
                message: attachment.note.to_string(),
            })
            .collect();
        Self {
            span: diag.span.to_source_span(),
            message: diag.message.to_string(),
            code: diag.constraint(),
            severity: diag.severity,
            related,
            src,
        }
    }
}

impl Diagnostic for CoarrayReport {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.code
            .map(|code| Box::new(code) as Box<dyn fmt::Display + 'a>)
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.severity {
            Severity::Error => miette::Severity::Error,
            Severity::Portability => miette::Severity::Warning,
            Severity::Because => miette::Severity::Advice,
        })
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.src)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.severity.to_string()),
            self.span,
        ))))
    }

    fn related<'a>(&'a self) -> Option<Box<dyn Iterator<Item = &'a dyn Diagnostic> + 'a>> {
        if self.related.is_empty() {
            return None;
        }
        Some(Box::new(
            self.related
                .iter()
                .map(|attachment| attachment as &dyn Diagnostic),
        ))
    }
}

/// Binds every diagnostic of a file to the file's source text.
pub fn file_reports(
    path: &Path,
    source: &str,
    diagnostics: &[CoarrayDiagnostic],
) -> Vec<CoarrayReport> {
    let named = NamedSource::new(path.display().to_string(), source.to_string());
    diagnostics
        .iter()
        .map(|diag| CoarrayReport::from_diagnostic(named.clone(), diag))
        .collect()
}

pub fn emit_diagnostics(path: &Path, source: &str, diagnostics: &[CoarrayDiagnostic]) {
    for report in file_reports(path, source, diagnostics) {
        eprintln!("{:?}", Report::new(report));
    }
}

/// Renders one diagnostic without colors, for logs and tests.
pub fn render_report(
    name: &str,
    source: &str,
    diag: &CoarrayDiagnostic,
) -> Result<String, fmt::Error> {
    let named = NamedSource::new(name, source.to_string());
    let report = CoarrayReport::from_diagnostic(named, diag);
    let mut out = String::new();
    GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
        .render_report(&mut out, &report)?;
    Ok(out)
}
