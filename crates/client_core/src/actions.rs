//! One handler per user action. Handlers own no state: the [`Session`] and the
//! [`SessionView`] are passed in, so every action can run against an in-memory view.

use shared::{
    domain::{ArtifactId, ArtifactKind},
    protocol::{ApiReply, FileAnalysis, HealthReply, TerminologyMatchRequest, TranslateRequest},
};
use tracing::{debug, info, warn};

use crate::{
    error::{ActionError, StateError, ValidationError},
    session::{is_ready, Session, UploadedFile},
    transport::{TransportError, TranslatorBackend},
    validation::{artifact_file_name, validate_upload, LocalFile},
    view::{
        ConnectionStatus, Control, Field, FileDetails, Panel, PanelContent, Progress,
        SessionView, TerminologySummary, Toast, TranslationSummary,
    },
};

/// Which stored workbook a translation starts from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TranslationInput {
    /// The terminology-matched workbook when one exists, else the upload.
    #[default]
    Auto,
    Uploaded,
    TerminologyMatched,
}

impl TranslationInput {
    fn control(self) -> Control {
        match self {
            Self::TerminologyMatched => Control::TranslateAfterTerminology,
            Self::Auto | Self::Uploaded => Control::StartTranslation,
        }
    }

    fn resolve(self, api_key: &str, session: &Session) -> Result<ArtifactId, ActionError> {
        match self {
            Self::TerminologyMatched => {
                let matched = session
                    .terminology_matched_filename
                    .clone()
                    .ok_or(StateError::NoTerminologyMatch)?;
                if api_key.is_empty() {
                    return Err(ValidationError::EmptyApiKey.into());
                }
                Ok(matched)
            }
            Self::Uploaded | Self::Auto => {
                let uploaded = session
                    .current_filename
                    .as_ref()
                    .filter(|_| is_ready(api_key, session))
                    .ok_or(ValidationError::MissingPrerequisites)?;
                if self == Self::Auto {
                    if let Some(matched) = &session.terminology_matched_filename {
                        return Ok(matched.clone());
                    }
                }
                Ok(uploaded.clone())
            }
        }
    }
}

fn fail<V: SessionView + ?Sized>(view: &mut V, action: &'static str, err: ActionError) -> ActionError {
    let message = match &err {
        ActionError::ServerRejected(message) => message.clone(),
        ActionError::Network(source) => format!("{action} failed: {source}"),
        other => other.to_string(),
    };
    if err.is_local() {
        debug!(action, error = %err, "action refused locally");
    } else {
        warn!(action, error = %err, "action failed");
    }
    view.notify(Toast::error(message));
    err
}

fn api_key_field<V: SessionView + ?Sized>(view: &V) -> String {
    view.field(Field::ApiKey).trim().to_string()
}

/// Recomputes which actions are enabled. Returns whether match/translate may run.
pub fn check_validity<V: SessionView + ?Sized>(session: &Session, view: &mut V) -> bool {
    let ready = is_ready(&view.field(Field::ApiKey), session);
    view.set_enabled(Control::TerminologyMatch, ready);
    view.set_enabled(Control::StartTranslation, ready);
    view.set_enabled(
        Control::TranslateAfterTerminology,
        session.terminology_matched_filename.is_some(),
    );
    view.set_enabled(Control::DownloadResult, session.download_filename.is_some());
    view.set_enabled(
        Control::DownloadTerminology,
        session.terminology_download_filename.is_some(),
    );
    ready
}

pub async fn validate_connection<V, B>(
    session: &mut Session,
    view: &mut V,
    backend: &B,
) -> Result<String, ActionError>
where
    V: SessionView + ?Sized,
    B: TranslatorBackend + ?Sized,
{
    let api_key = api_key_field(view);
    if api_key.is_empty() {
        return Err(fail(view, "connection test", ValidationError::EmptyApiKey.into()));
    }

    view.set_busy(Control::TestConnection, true);
    view.set_enabled(Control::TestConnection, false);
    info!("testing api connection");

    let outcome = match backend.test_connection(&api_key).await {
        Ok(ApiReply::Accepted(reply)) => {
            session.api_key = api_key;
            view.show(PanelContent::ConnectionStatus(ConnectionStatus::Connected(
                reply.message.clone(),
            )));
            view.notify(Toast::success("API connection test succeeded"));
            info!("api connection verified");
            Ok(reply.message)
        }
        Ok(ApiReply::Rejected(message)) => {
            view.show(PanelContent::ConnectionStatus(ConnectionStatus::Failed(
                message.clone(),
            )));
            Err(fail(view, "connection test", ActionError::ServerRejected(message)))
        }
        Err(err) => {
            view.show(PanelContent::ConnectionStatus(ConnectionStatus::Failed(
                format!("connection failed: {err}"),
            )));
            Err(fail(view, "connection test", err.into()))
        }
    };

    view.set_busy(Control::TestConnection, false);
    view.set_enabled(Control::TestConnection, true);
    check_validity(session, view);
    outcome
}

/// Best-effort workbook statistics; any failure degrades to `None`.
pub async fn inspect_file<B>(backend: &B, filename: &ArtifactId) -> Option<FileAnalysis>
where
    B: TranslatorBackend + ?Sized,
{
    match backend.file_info(filename).await {
        Ok(ApiReply::Accepted(reply)) => Some(reply.info),
        Ok(ApiReply::Rejected(message)) => {
            warn!(%filename, %message, "file inspection rejected");
            None
        }
        Err(err) => {
            warn!(%filename, error = %err, "file inspection failed");
            None
        }
    }
}

pub async fn upload_file<V, B>(
    session: &mut Session,
    view: &mut V,
    backend: &B,
    file: LocalFile,
) -> Result<ArtifactId, ActionError>
where
    V: SessionView + ?Sized,
    B: TranslatorBackend + ?Sized,
{
    if let Err(err) = validate_upload(&file) {
        view.clear_field(Field::FileInput);
        return Err(fail(view, "upload", err.into()));
    }

    view.set_field(Field::FileInput, &file.name);
    info!(name = %file.name, size = file.size, "uploading workbook");

    let reply = match backend.upload(&file).await {
        Ok(ApiReply::Accepted(reply)) => reply,
        Ok(ApiReply::Rejected(message)) => {
            view.clear_field(Field::FileInput);
            return Err(fail(view, "upload", ActionError::ServerRejected(message)));
        }
        Err(err) => {
            view.clear_field(Field::FileInput);
            return Err(fail(view, "upload", err.into()));
        }
    };

    info!(filename = %reply.filename, size = reply.size, "workbook uploaded");
    session.current_filename = Some(reply.filename.clone());
    session.uploaded_file = Some(UploadedFile {
        name: file.name,
        size: file.size,
    });
    session.forget_derived_artifacts();
    view.hide(Panel::TerminologyResult);
    view.hide(Panel::TranslationResult);
    view.notify(Toast::success("File uploaded"));

    let analysis = inspect_file(backend, &reply.filename).await;
    view.show(PanelContent::FileInfo(FileDetails {
        original_name: reply.original_name,
        size: reply.size,
        analysis,
    }));

    check_validity(session, view);
    Ok(reply.filename)
}

pub async fn start_terminology_match<V, B>(
    session: &mut Session,
    view: &mut V,
    backend: &B,
) -> Result<TerminologySummary, ActionError>
where
    V: SessionView + ?Sized,
    B: TranslatorBackend + ?Sized,
{
    let api_key = api_key_field(view);
    let filename = match session
        .current_filename
        .clone()
        .filter(|_| is_ready(&api_key, session))
    {
        Some(filename) => filename,
        None => {
            return Err(fail(
                view,
                "terminology match",
                ValidationError::MissingPrerequisites.into(),
            ))
        }
    };

    view.set_progress(Progress::Terminology, true);
    view.set_busy(Control::TerminologyMatch, true);
    view.set_enabled(Control::TerminologyMatch, false);
    info!(%filename, "starting terminology match");

    let request = TerminologyMatchRequest { api_key, filename };
    let outcome = match backend.terminology_match(&request).await {
        Ok(ApiReply::Accepted(reply)) => {
            info!(
                download_filename = %reply.download_filename,
                matched_filename = %reply.matched_filename,
                replacement_count = reply.replacement_count,
                "terminology match finished"
            );
            session.terminology_download_filename = Some(reply.download_filename.clone());
            session.terminology_matched_filename = Some(reply.matched_filename);
            let summary = TerminologySummary {
                download_filename: reply.download_filename,
                replacement_count: reply.replacement_count,
                file_size: reply.file_size,
            };
            view.show(PanelContent::TerminologyResult(summary.clone()));
            view.notify(Toast::success(format!(
                "Terminology match complete: {} terms replaced",
                reply.replacement_count
            )));
            Ok(summary)
        }
        Ok(ApiReply::Rejected(message)) => Err(fail(
            view,
            "terminology match",
            ActionError::ServerRejected(message),
        )),
        Err(err) => Err(fail(view, "terminology match", err.into())),
    };

    view.set_progress(Progress::Terminology, false);
    view.set_busy(Control::TerminologyMatch, false);
    check_validity(session, view);
    outcome
}

pub async fn translate<V, B>(
    session: &mut Session,
    view: &mut V,
    backend: &B,
    input: TranslationInput,
) -> Result<TranslationSummary, ActionError>
where
    V: SessionView + ?Sized,
    B: TranslatorBackend + ?Sized,
{
    let api_key = api_key_field(view);
    let keywords = view.field(Field::Keywords).trim().to_string();
    let filename = match input.resolve(&api_key, session) {
        Ok(filename) => filename,
        Err(err) => return Err(fail(view, "translation", err)),
    };

    let control = input.control();
    view.set_progress(Progress::Translation, true);
    view.set_busy(control, true);
    view.set_enabled(control, false);
    info!(%filename, ?input, keywords = %keywords, "starting translation");

    let request = TranslateRequest {
        api_key,
        filename,
        keywords,
    };
    let outcome = match backend.translate(&request).await {
        Ok(ApiReply::Accepted(reply)) => {
            info!(
                download_filename = %reply.download_filename,
                output_size = reply.output_size,
                "translation finished"
            );
            session.download_filename = Some(reply.download_filename.clone());
            let summary = TranslationSummary {
                source_name: session.uploaded_file.as_ref().map(|file| file.name.clone()),
                download_filename: reply.download_filename,
                output_size: reply.output_size,
            };
            view.show(PanelContent::TranslationResult(summary.clone()));
            view.notify(Toast::success("Translation complete"));
            Ok(summary)
        }
        Ok(ApiReply::Rejected(message)) => Err(fail(
            view,
            "translation",
            ActionError::ServerRejected(message),
        )),
        Err(err) => Err(fail(view, "translation", err.into())),
    };

    view.set_progress(Progress::Translation, false);
    view.set_busy(control, false);
    check_validity(session, view);
    outcome
}

pub async fn continue_after_terminology<V, B>(
    session: &mut Session,
    view: &mut V,
    backend: &B,
) -> Result<TranslationSummary, ActionError>
where
    V: SessionView + ?Sized,
    B: TranslatorBackend + ?Sized,
{
    translate(session, view, backend, TranslationInput::TerminologyMatched).await
}

pub async fn download_artifact<V, B>(
    session: &Session,
    view: &mut V,
    backend: &B,
    kind: ArtifactKind,
) -> Result<ArtifactId, ActionError>
where
    V: SessionView + ?Sized,
    B: TranslatorBackend + ?Sized,
{
    let identifier = match kind {
        ArtifactKind::Translation => session.download_filename.clone(),
        ArtifactKind::Terminology => session.terminology_download_filename.clone(),
    };
    let Some(identifier) = identifier else {
        return Err(fail(view, "download", StateError::NothingToDownload(kind).into()));
    };
    if let Err(err) = artifact_file_name(identifier.as_str()) {
        return Err(fail(
            view,
            "download",
            ActionError::Download(format!("refusing to save: {err}")),
        ));
    }

    info!(%identifier, %kind, "downloading artifact");
    let bytes = match backend.download(&identifier).await {
        Ok(bytes) => bytes,
        Err(TransportError::Status(status)) => {
            return Err(fail(
                view,
                "download",
                ActionError::Download(format!("server returned HTTP {status}")),
            ))
        }
        Err(err) => return Err(fail(view, "download", ActionError::Download(err.to_string()))),
    };

    if let Err(err) = view.save_artifact(identifier.as_str(), &bytes) {
        return Err(fail(
            view,
            "download",
            ActionError::Download(format!("could not save {identifier}: {err:#}")),
        ));
    }

    info!(%identifier, bytes = bytes.len(), "artifact saved");
    view.notify(Toast::success(format!("Downloaded {kind} file {identifier}")));
    Ok(identifier)
}

pub fn reset_session<V: SessionView + ?Sized>(session: &mut Session, view: &mut V) {
    view.clear_field(Field::ApiKey);
    view.clear_field(Field::FileInput);
    view.clear_field(Field::Keywords);
    session.clear();
    view.set_key_masked(true);

    for panel in [
        Panel::ConnectionStatus,
        Panel::FileInfo,
        Panel::TerminologyResult,
        Panel::TranslationResult,
    ] {
        view.hide(panel);
    }

    check_validity(session, view);
    view.notify(Toast::info("Reset", "Form cleared; ready for a new translation"));
    info!("session reset");
}

/// Fills the domain hint with one of the quick-pick keywords.
pub fn select_keyword<V: SessionView + ?Sized>(view: &mut V, keyword: &str) {
    view.set_field(Field::Keywords, keyword);
    view.notify(Toast::info("Domain selected", keyword));
}

pub fn toggle_key_visibility<V: SessionView + ?Sized>(session: &mut Session, view: &mut V) -> bool {
    session.key_visible = !session.key_visible;
    view.set_key_masked(!session.key_visible);
    session.key_visible
}

pub async fn check_health<V, B>(view: &mut V, backend: &B) -> Result<HealthReply, ActionError>
where
    V: SessionView + ?Sized,
    B: TranslatorBackend + ?Sized,
{
    match backend.health().await {
        Ok(reply) => {
            view.notify(Toast::info("Server", format!("status: {}", reply.status)));
            Ok(reply)
        }
        Err(err) => Err(fail(view, "health check", err.into())),
    }
}

#[cfg(test)]
#[path = "tests/actions_tests.rs"]
mod tests;
