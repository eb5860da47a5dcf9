//! Client-side controller for the spreadsheet translation service.
//!
//! [`SessionController`] owns one [`Session`], one [`SessionView`] and one
//! [`TranslatorBackend`], and forwards each user action to the matching
//! handler in [`actions`].

use shared::{
    domain::{ArtifactId, ArtifactKind},
    protocol::HealthReply,
};

pub mod actions;
pub mod error;
pub mod format;
pub mod session;
pub mod transport;
pub mod validation;
pub mod view;

pub use actions::TranslationInput;
pub use error::{ActionError, StateError, ValidationError};
pub use session::{is_ready, Session, UploadedFile};
pub use transport::{HttpBackend, TransportError, TranslatorBackend};
pub use validation::{LocalFile, MAX_UPLOAD_BYTES};
pub use view::SessionView;

use view::{TerminologySummary, TranslationSummary};

/// Runs actions one at a time: every action borrows the controller mutably.
pub struct SessionController<B, V> {
    backend: B,
    view: V,
    session: Session,
}

impl<B: TranslatorBackend, V: SessionView> SessionController<B, V> {
    pub fn new(backend: B, view: V) -> Self {
        let mut controller = Self {
            backend,
            view,
            session: Session::new(),
        };
        controller.check_validity();
        controller
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Call after every edit to the key or file inputs.
    pub fn check_validity(&mut self) -> bool {
        actions::check_validity(&self.session, &mut self.view)
    }

    pub async fn validate_connection(&mut self) -> Result<String, ActionError> {
        actions::validate_connection(&mut self.session, &mut self.view, &self.backend).await
    }

    pub async fn upload_file(&mut self, file: LocalFile) -> Result<ArtifactId, ActionError> {
        actions::upload_file(&mut self.session, &mut self.view, &self.backend, file).await
    }

    pub async fn start_terminology_match(&mut self) -> Result<TerminologySummary, ActionError> {
        actions::start_terminology_match(&mut self.session, &mut self.view, &self.backend).await
    }

    pub async fn translate(
        &mut self,
        input: TranslationInput,
    ) -> Result<TranslationSummary, ActionError> {
        actions::translate(&mut self.session, &mut self.view, &self.backend, input).await
    }

    pub async fn continue_after_terminology(&mut self) -> Result<TranslationSummary, ActionError> {
        actions::continue_after_terminology(&mut self.session, &mut self.view, &self.backend).await
    }

    pub async fn download_artifact(&mut self, kind: ArtifactKind) -> Result<ArtifactId, ActionError> {
        actions::download_artifact(&self.session, &mut self.view, &self.backend, kind).await
    }

    pub fn reset_session(&mut self) {
        actions::reset_session(&mut self.session, &mut self.view);
    }

    pub fn select_keyword(&mut self, keyword: &str) {
        actions::select_keyword(&mut self.view, keyword);
    }

    pub fn toggle_key_visibility(&mut self) -> bool {
        actions::toggle_key_visibility(&mut self.session, &mut self.view)
    }

    pub async fn check_health(&mut self) -> Result<HealthReply, ActionError> {
        actions::check_health(&mut self.view, &self.backend).await
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
