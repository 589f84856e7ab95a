use tracing::{debug, warn};

use super::api::RegistrationApi;
use crate::users::dto::RegisterRequest;

pub const LABEL_IDLE: &str = "Register";
pub const LABEL_BUSY: &str = "Submitting...";

pub const MSG_FILL_ALL: &str = "Please fill all fields";
pub const MSG_SUCCESS: &str = "Registration successful! ✓";
pub const MSG_FAILED: &str = "Registration failed";
pub const MSG_UNREACHABLE: &str =
    "Unable to connect to server. Please make sure the server is running.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Validating,
    Submitting,
    Success,
    Failed,
}

/// State of the submit button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitControl {
    pub enabled: bool,
    pub label: &'static str,
}

impl SubmitControl {
    fn ready() -> Self {
        Self { enabled: true, label: LABEL_IDLE }
    }

    fn busy() -> Self {
        Self { enabled: false, label: LABEL_BUSY }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Self::Success(t) | Self::Error(t) => t,
        }
    }
}

/// Whatever displays the form; called on every phase change.
pub trait FormView {
    fn render(&mut self, phase: FormPhase, control: &SubmitControl, notice: Option<&Notice>);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub struct RegistrationForm<A, V> {
    api: A,
    view: V,
    fields: FormFields,
    phase: FormPhase,
    control: SubmitControl,
    notice: Option<Notice>,
}

impl<A: RegistrationApi, V: FormView> RegistrationForm<A, V> {
    pub fn new(api: A, view: V) -> Self {
        Self {
            api,
            view,
            fields: FormFields::default(),
            phase: FormPhase::Idle,
            control: SubmitControl::ready(),
            notice: None,
        }
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FormFields {
        &mut self.fields
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn control(&self) -> &SubmitControl {
        &self.control
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    fn enter(&mut self, phase: FormPhase) {
        debug!(from = ?self.phase, to = ?phase, "form transition");
        self.phase = phase;
        self.view.render(phase, &self.control, self.notice.as_ref());
    }

    /// Run one submission to completion and return its terminal phase
    /// (`Success` or `Failed`). The form is back in `Idle` afterwards with the
    /// notice still set.
    pub async fn submit(&mut self) -> FormPhase {
        self.notice = None;
        self.enter(FormPhase::Validating);

        let req = RegisterRequest {
            name: self.fields.name.trim().to_string(),
            email: self.fields.email.trim().to_string(),
            password: self.fields.password.trim().to_string(),
        };
        let outcome = if req.name.is_empty() || req.email.is_empty() || req.password.is_empty() {
            self.notice = Some(Notice::Error(MSG_FILL_ALL.into()));
            FormPhase::Failed
        } else {
            self.control = SubmitControl::busy();
            self.enter(FormPhase::Submitting);
            let outcome = self.send(&req).await;
            self.control = SubmitControl::ready();
            outcome
        };

        self.enter(outcome);
        self.enter(FormPhase::Idle);
        outcome
    }

    async fn send(&mut self, req: &RegisterRequest) -> FormPhase {
        match self.api.register(req).await {
            Ok(reply) if reply.is_success() => {
                self.notice = Some(Notice::Success(MSG_SUCCESS.into()));
                self.fields = FormFields::default();
                FormPhase::Success
            }
            Ok(reply) => {
                let message = reply
                    .body
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| MSG_FAILED.into());
                self.notice = Some(Notice::Error(message));
                FormPhase::Failed
            }
            Err(e) => {
                warn!(error = %e, "registration request failed");
                self.notice = Some(Notice::Error(MSG_UNREACHABLE.into()));
                FormPhase::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    use async_trait::async_trait;

    use super::*;
    use crate::client::api::{ApiReply, ClientError, ReplyBody};

    enum Scripted {
        Reply(u16, bool, Option<&'static str>),
        Unparseable,
    }

    struct FakeApi {
        script: Scripted,
        calls: AtomicUsize,
        last: Mutex<Option<RegisterRequest>>,
    }

    impl FakeApi {
        fn new(script: Scripted) -> Self {
            Self { script, calls: AtomicUsize::new(0), last: Mutex::new(None) }
        }
    }

    #[async_trait]
    impl RegistrationApi for FakeApi {
        async fn register(&self, req: &RegisterRequest) -> Result<ApiReply, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(req.clone());
            match &self.script {
                Scripted::Reply(status, success, message) => Ok(ApiReply {
                    status: *status,
                    body: ReplyBody { success: *success, message: message.map(String::from) },
                }),
                Scripted::Unparseable => {
                    Err(serde_json::from_str::<ReplyBody>("<html>").unwrap_err().into())
                }
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        frames: Vec<(FormPhase, SubmitControl)>,
    }

    impl FormView for Recorder {
        fn render(&mut self, phase: FormPhase, control: &SubmitControl, _notice: Option<&Notice>) {
            self.frames.push((phase, control.clone()));
        }
    }

    fn form(script: Scripted) -> RegistrationForm<FakeApi, Recorder> {
        let mut form = RegistrationForm::new(FakeApi::new(script), Recorder::default());
        *form.fields_mut() = FormFields {
            name: " Alice ".into(),
            email: "alice@example.com ".into(),
            password: "pw123".into(),
        };
        form
    }

    fn phases(form: &RegistrationForm<FakeApi, Recorder>) -> Vec<FormPhase> {
        form.view().frames.iter().map(|(p, _)| *p).collect()
    }

    #[tokio::test]
    async fn success_walks_the_full_cycle_and_clears_fields() {
        let mut form = form(Scripted::Reply(201, true, Some("User registered successfully")));

        assert_eq!(form.submit().await, FormPhase::Success);
        assert_eq!(
            phases(&form),
            vec![
                FormPhase::Validating,
                FormPhase::Submitting,
                FormPhase::Success,
                FormPhase::Idle
            ]
        );
        assert_eq!(form.notice(), Some(&Notice::Success(MSG_SUCCESS.into())));
        assert_eq!(form.fields(), &FormFields::default());
        assert_eq!(form.phase(), FormPhase::Idle);

        let sent = form.api.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.name, "Alice");
        assert_eq!(sent.email, "alice@example.com");
    }

    #[tokio::test]
    async fn control_is_disabled_only_while_submitting() {
        let mut form = form(Scripted::Reply(201, true, None));
        form.submit().await;

        for (phase, control) in &form.view().frames {
            if *phase == FormPhase::Submitting {
                assert_eq!(control, &SubmitControl { enabled: false, label: LABEL_BUSY });
            }
        }
        let (_, last) = form.view().frames.last().unwrap();
        assert_eq!(last, &SubmitControl { enabled: true, label: LABEL_IDLE });
    }

    #[tokio::test]
    async fn blank_field_fails_locally() {
        let mut form = form(Scripted::Reply(201, true, None));
        form.fields_mut().password = "   ".into();

        assert_eq!(form.submit().await, FormPhase::Failed);
        assert_eq!(form.api.calls.load(Ordering::SeqCst), 0);
        assert_eq!(form.notice().map(Notice::text), Some(MSG_FILL_ALL));
        assert!(!phases(&form).contains(&FormPhase::Submitting));
        assert!(form.control().enabled);
    }

    #[tokio::test]
    async fn server_message_is_shown_and_fields_kept() {
        let mut form = form(Scripted::Reply(409, false, Some("Email already registered")));

        assert_eq!(form.submit().await, FormPhase::Failed);
        assert_eq!(form.notice(), Some(&Notice::Error("Email already registered".into())));
        assert_eq!(form.fields().email, "alice@example.com ");
        assert!(form.control().enabled);
    }

    #[tokio::test]
    async fn missing_message_falls_back() {
        let mut no_message = form(Scripted::Reply(500, false, None));
        no_message.submit().await;
        assert_eq!(no_message.notice().map(Notice::text), Some(MSG_FAILED));

        let mut empty_message = form(Scripted::Reply(200, false, Some("")));
        empty_message.submit().await;
        assert_eq!(empty_message.notice().map(Notice::text), Some(MSG_FAILED));
    }

    #[tokio::test]
    async fn transport_failure_has_its_own_message() {
        let mut form = form(Scripted::Unparseable);

        assert_eq!(form.submit().await, FormPhase::Failed);
        assert_eq!(form.notice().map(Notice::text), Some(MSG_UNREACHABLE));
        assert_eq!(form.control().label, LABEL_IDLE);
    }
}
