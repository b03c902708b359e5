//! Integration tests for syncstore

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const USER: &str = "@alice:example.org";

    const SYNC_RESPONSE: &str = r##"{
        "next_batch": "s1_2_3",
        "rooms": {
            "join": {
                "!joined:x": {
                    "timeline": {"events": [
                        {"type": "m.room.message", "event_id": "$msg", "content": {"body": "hello"}}
                    ]}
                }
            },
            "invite": {
                "!invited:x": {
                    "invite_state": {"events": [
                        {"type": "m.room.canonical_alias", "content": {"alias": "#a:x"}},
                        {"type": "m.room.name", "content": {"name": "Foo"}}
                    ]}
                }
            }
        }
    }"##;

    /// Isolated config + cache directory
    struct Sandbox {
        dir: TempDir,
    }

    impl Sandbox {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let cache = dir.path().join("cache");
            fs::write(
                dir.path().join("config.toml"),
                format!("[storage]\ncache_dir = {:?}\n", cache.display().to_string()),
            )
            .unwrap();
            Self { dir }
        }

        fn config_path(&self) -> PathBuf {
            self.dir.path().join("config.toml")
        }

        fn document_path(&self) -> PathBuf {
            self.dir
                .path()
                .join("cache")
                .join("SyncResponse")
                .join(USER)
                .join("syncResponse")
        }

        fn cmd(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("syncstore");
            cmd.env_remove("SYNCSTORE_USER")
                .arg("--config")
                .arg(self.config_path())
                .arg("--user")
                .arg(USER);
            cmd
        }

        fn write_input(&self, name: &str, contents: &str) -> PathBuf {
            let path = self.dir.path().join(name);
            fs::write(&path, contents).unwrap();
            path
        }

        fn seed(&self) {
            let input = self.write_input("sync.json", SYNC_RESPONSE);
            self.cmd().arg("merge").arg(&input).assert().success();
        }
    }

    fn syncstore() -> Command {
        cargo_bin_cmd!("syncstore")
    }

    fn exists(path: &Path) -> bool {
        path.exists()
    }

    #[test]
    fn help_displays() {
        syncstore()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Local cache for messaging sync responses"));
    }

    #[test]
    fn version_displays() {
        syncstore()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("syncstore"));
    }

    #[test]
    fn missing_user_is_reported() {
        let sandbox = Sandbox::new();
        syncstore()
            .env_remove("SYNCSTORE_USER")
            .arg("--config")
            .arg(sandbox.config_path())
            .arg("status")
            .assert()
            .failure()
            .stderr(predicate::str::contains("No user id"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn cold_start_show() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .arg("show")
            .assert()
            .success()
            .stdout(predicate::str::contains("No cached sync response"));
    }

    #[test]
    fn merge_then_show() {
        let sandbox = Sandbox::new();
        sandbox.seed();

        assert!(exists(&sandbox.document_path()));
        sandbox
            .cmd()
            .args(["show", "--compact"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"next_batch\":\"s1_2_3\""));
    }

    #[test]
    fn merge_from_stdin() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["merge", "-"])
            .write_stdin(SYNC_RESPONSE)
            .assert()
            .success()
            .stdout(predicate::str::contains("Merged 2 room(s)"));

        assert!(exists(&sandbox.document_path()));
    }

    #[test]
    fn merge_rejects_invalid_json() {
        let sandbox = Sandbox::new();
        let input = sandbox.write_input("bad.json", "{not json");

        sandbox
            .cmd()
            .arg("merge")
            .arg(&input)
            .assert()
            .failure()
            .stderr(predicate::str::contains("JSON error"));
        assert!(!exists(&sandbox.document_path()));
    }

    #[test]
    fn merges_accumulate_timeline() {
        let sandbox = Sandbox::new();
        sandbox.seed();

        let next = sandbox.write_input(
            "next.json",
            r#"{"next_batch": "s2", "rooms": {"join": {"!joined:x": {"timeline": {"events": [
                {"type": "m.room.message", "event_id": "$later", "content": {"body": "again"}}
            ]}}}}}"#,
        );
        sandbox.cmd().arg("merge").arg(&next).assert().success();

        sandbox
            .cmd()
            .args(["event", "!joined:x", "$msg"])
            .assert()
            .success()
            .stdout(predicate::str::contains("hello"));
        sandbox
            .cmd()
            .args(["event", "!joined:x", "$later"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"room_id\": \"!joined:x\""));
    }

    #[test]
    fn event_not_found() {
        let sandbox = Sandbox::new();
        sandbox.seed();

        sandbox
            .cmd()
            .args(["event", "!joined:x", "$nope"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Event $nope not found"));
    }

    #[test]
    fn summary_prefers_room_name() {
        let sandbox = Sandbox::new();
        sandbox.seed();

        sandbox
            .cmd()
            .args(["summary", "!invited:x"])
            .assert()
            .success()
            .stdout(predicate::str::diff("Foo\n"));

        sandbox
            .cmd()
            .args(["summary", "!joined:x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No summary available"));
    }

    #[test]
    fn rooms_lists_categories() {
        let sandbox = Sandbox::new();
        sandbox.seed();

        sandbox
            .cmd()
            .args(["rooms", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"membership\": \"invite\""))
            .stdout(predicate::str::contains("\"name\": \"Foo\""));
    }

    #[test]
    fn rooms_plain_lists_membership() {
        let sandbox = Sandbox::new();
        sandbox.seed();

        sandbox
            .cmd()
            .args(["rooms", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::diff("!joined:x\tjoin\n!invited:x\tinvite\n"));
    }

    #[test]
    fn status_reports_counts() {
        let sandbox = Sandbox::new();
        sandbox.seed();

        sandbox
            .cmd()
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("Joined rooms: 1"))
            .stdout(predicate::str::contains("Invited rooms: 1"))
            .stdout(predicate::str::contains("Next batch: s1_2_3"));
    }

    #[test]
    fn clear_requires_confirmation() {
        let sandbox = Sandbox::new();
        sandbox.seed();

        sandbox.cmd().arg("clear").assert().success();
        assert!(exists(&sandbox.document_path()));

        sandbox.cmd().args(["clear", "--yes"]).assert().success();
        assert!(!exists(&sandbox.document_path()));

        // Clearing an empty cache is fine
        sandbox.cmd().args(["clear", "--yes"]).assert().success();
    }

    #[test]
    fn config_set_and_show() {
        let sandbox = Sandbox::new();

        sandbox
            .cmd()
            .args(["config", "set", "merge.list_policy", "replace"])
            .assert()
            .success();

        sandbox
            .cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("list_policy = \"replace\""));
    }

    #[test]
    fn config_path() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }
}
