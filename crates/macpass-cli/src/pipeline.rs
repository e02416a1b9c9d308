//! One access request, start to finish
//!
//! ```text
//! Start -> Authenticating -> Collecting -> Dispatching -> Done
//! ```
//!
//! Any error stops the run in the stage where it happened. Nothing is
//! retried and nothing carries over to the next invocation.

use crate::dispatch::{dispatch, prepare_request, Notifier};
use crate::prompt::{read_hours, read_mac, CredentialPrompt, Prompter};
use macpass_auth::{authenticate, DirectoryConnector};
use macpass_core::{AccessRequest, MacpassConfig, Result};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Authenticating,
    Collecting,
    Dispatching,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "starting",
            Stage::Authenticating => "authenticating",
            Stage::Collecting => "collecting request details",
            Stage::Dispatching => "dispatching",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

pub struct Pipeline<'a, C: ?Sized, N: ?Sized> {
    config: &'a MacpassConfig,
    connector: &'a C,
    notifier: &'a N,
    stage: Stage,
}

impl<'a, C, N> Pipeline<'a, C, N>
where
    C: DirectoryConnector + ?Sized,
    N: Notifier + ?Sized,
{
    pub fn new(config: &'a MacpassConfig, connector: &'a C, notifier: &'a N) -> Self {
        Self {
            config,
            connector,
            notifier,
            stage: Stage::Start,
        }
    }

    /// Stage reached so far; after a failure, the stage that failed
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub async fn run<P: Prompter + ?Sized>(&mut self, prompter: &mut P) -> Result<AccessRequest> {
        self.enter(Stage::Authenticating);
        let identity = {
            let mut source = CredentialPrompt::new(&mut *prompter);
            authenticate(self.connector, self.config, &mut source).await?
        };

        self.enter(Stage::Collecting);
        let mac = read_mac(prompter)?;
        let hours = read_hours(prompter)?;
        let request = prepare_request(&identity, &mac, hours, self.config.strict_mac)?;

        self.enter(Stage::Dispatching);
        dispatch(&request, self.notifier).await?;

        self.enter(Stage::Done);
        Ok(request)
    }

    fn enter(&mut self, stage: Stage) {
        debug!("{} -> {}", self.stage, stage);
        self.stage = stage;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::tests::doubles::RecordingNotifier;
    use crate::dispatch::UnixSocketNotifier;
    use crate::prompt::{
        LinePrompter, HOURS_PROMPT, MAC_PROMPT, PASSWORD_PROMPT, USERNAME_PROMPT,
    };
    use macpass_auth::testing::FakeDirectory;
    use macpass_core::Error;
    use std::io::Cursor;
    use std::time::Duration;

    const ADMIN_DN: &str = "cn=readonly,dc=example,dc=com";
    const ALICE_DN: &str = "uid=alice,ou=people,dc=example,dc=com";
    const HOUR: Duration = Duration::from_secs(3600);

    fn config() -> MacpassConfig {
        MacpassConfig::from_toml(
            r#"
ldapUri = "ldap://localhost:389"
baseDN = "ou=people,dc=example,dc=com"
bindAdmin = "cn=readonly,dc=example,dc=com"
bindPassword = "admin-secret"
userDNType = "uid"
"#,
        )
        .unwrap()
    }

    fn directory() -> FakeDirectory {
        FakeDirectory::new()
            .with_account(ADMIN_DN, "admin-secret")
            .with_account(ALICE_DN, "wonderland")
    }

    fn terminal(input: &str) -> LinePrompter<Cursor<Vec<u8>>, Vec<u8>> {
        LinePrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[tokio::test]
    async fn test_full_run() {
        let config = config();
        let directory = directory();
        let notifier = RecordingNotifier::default();
        let mut terminal = terminal("alice\nwonderland\nAA:BB:CC:DD:EE:FF\n2\n");

        let mut pipeline = Pipeline::new(&config, &directory, &notifier);
        let request = pipeline.run(&mut terminal).await.unwrap();

        assert_eq!(pipeline.stage(), Stage::Done);
        assert_eq!(request.user(), "alice");
        assert_eq!(request.mac(), "AA:BB:CC:DD:EE:FF");
        assert_eq!(request.duration(), HOUR * 2);

        let payloads = notifier.payloads();
        assert_eq!(payloads.len(), 1);
        assert_eq!(AccessRequest::decode(&payloads[0]).unwrap(), request);

        let shown = String::from_utf8(terminal.into_writer()).unwrap();
        assert_eq!(
            shown,
            [USERNAME_PROMPT, PASSWORD_PROMPT, MAC_PROMPT, HOURS_PROMPT].concat()
        );
        assert_eq!(directory.close_count(), 1);
    }

    #[tokio::test]
    async fn test_long_duration_is_capped() {
        let config = config();
        let directory = directory();
        let notifier = RecordingNotifier::default();
        let mut terminal = terminal("alice\nwonderland\nAA:BB:CC:DD:EE:FF\n99\n");

        let request = Pipeline::new(&config, &directory, &notifier)
            .run(&mut terminal)
            .await
            .unwrap();

        assert_eq!(request.duration(), HOUR * 4);
    }

    #[tokio::test]
    async fn test_malformed_mac_still_sent() {
        let config = config();
        let directory = directory();
        let notifier = RecordingNotifier::default();
        let mut terminal = terminal("alice\nwonderland\nnot-a-mac\n1\n");

        let request = Pipeline::new(&config, &directory, &notifier)
            .run(&mut terminal)
            .await
            .unwrap();

        assert_eq!(request.mac(), "not-a-mac");
        assert_eq!(notifier.payloads().len(), 1);
    }

    #[tokio::test]
    async fn test_strict_mac_stops_before_dispatch() {
        let mut config = config();
        config.strict_mac = true;
        let directory = directory();
        let notifier = RecordingNotifier::default();
        let mut terminal = terminal("alice\nwonderland\nnot-a-mac\n1\n");

        let mut pipeline = Pipeline::new(&config, &directory, &notifier);
        let err = pipeline.run(&mut terminal).await.unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(pipeline.stage(), Stage::Collecting);
        assert!(notifier.payloads().is_empty());
    }

    #[tokio::test]
    async fn test_admin_bind_failure_sends_nothing() {
        let config = config();
        let directory = FakeDirectory::new().with_account(ALICE_DN, "wonderland");
        let notifier = RecordingNotifier::default();
        let mut terminal = terminal("alice\nwonderland\nAA:BB:CC:DD:EE:FF\n2\n");

        let mut pipeline = Pipeline::new(&config, &directory, &notifier);
        let err = pipeline.run(&mut terminal).await.unwrap_err();

        assert!(matches!(err, Error::Auth(_)));
        assert_eq!(pipeline.stage(), Stage::Authenticating);
        assert!(notifier.payloads().is_empty());
        assert!(!directory.secret_was_sent("wonderland"));

        // the user was never prompted
        assert!(terminal.into_writer().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_password_sends_nothing() {
        let config = config();
        let directory = directory();
        let notifier = RecordingNotifier::default();
        let mut terminal = terminal("alice\nguess\nAA:BB:CC:DD:EE:FF\n2\n");

        let err = Pipeline::new(&config, &directory, &notifier)
            .run(&mut terminal)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Auth(_)));
        assert!(notifier.payloads().is_empty());
        assert_eq!(directory.close_count(), 1);
    }

    #[tokio::test]
    async fn test_absent_daemon_socket() {
        let dir = tempfile::tempdir().unwrap();
        let config = config();
        let directory = directory();
        let notifier = UnixSocketNotifier::new(dir.path().join("macpass.sock"), HOUR);
        let mut terminal = terminal("alice\nwonderland\nAA:BB:CC:DD:EE:FF\n2\n");

        let mut pipeline = Pipeline::new(&config, &directory, &notifier);
        let err = pipeline.run(&mut terminal).await.unwrap_err();

        assert!(matches!(err, Error::Connection(_)));
        assert_eq!(pipeline.stage(), Stage::Dispatching);
    }
}
