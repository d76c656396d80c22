//! Integration tests for Carton

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"
platforms = ["ios"]

[swift_package_manager]
tools_version = "5.4"

[[swift_package_manager.packages]]
url = "https://github.com/Alamofire/Alamofire"
requirement = { up_to_next_major = "5.0.0" }

[[swift_package_manager.packages]]
path = "LocalPackages/Shared"
"#;

    fn carton(config_dir: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("carton");
        cmd.env("CARTON_CONFIG", config_dir.path().join("config.toml"));
        cmd
    }

    fn project_with_manifest(content: &str) -> TempDir {
        let project = TempDir::new().unwrap();
        std::fs::write(project.path().join("Dependencies.toml"), content).unwrap();
        project
    }

    #[test]
    fn help_displays() {
        let config = TempDir::new().unwrap();
        carton(&config)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("prebuilt"));
    }

    #[test]
    fn version_displays() {
        let config = TempDir::new().unwrap();
        carton(&config)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("carton"));
    }

    #[test]
    fn manifest_renders_package_swift() {
        let config = TempDir::new().unwrap();
        let project = project_with_manifest(MANIFEST);

        carton(&config)
            .arg("manifest")
            .arg("--project")
            .arg(project.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("// swift-tools-version:5.4"))
            .stdout(predicate::str::contains(
                ".package(url: \"https://github.com/Alamofire/Alamofire\"",
            ))
            .stdout(predicate::str::contains("LocalPackages/Shared"));
    }

    #[test]
    fn manifest_missing_fails_with_hint() {
        let config = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();

        carton(&config)
            .arg("manifest")
            .arg("--project")
            .arg(project.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Dependencies manifest not found"));
    }

    #[test]
    fn manifest_invalid_fails() {
        let config = TempDir::new().unwrap();
        let project = project_with_manifest(
            "[[swift_package_manager.packages]]\nurl = \"https://example.com/a\"\n",
        );

        carton(&config)
            .arg("manifest")
            .arg("--project")
            .arg(project.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error:"));
    }

    #[test]
    fn fetch_unknown_platform_rejected() {
        let config = TempDir::new().unwrap();
        carton(&config)
            .args(["fetch", "--platform", "linux"])
            .assert()
            .failure();
    }

    #[test]
    fn fetch_without_packages_cleans_cache() {
        let config = TempDir::new().unwrap();
        let project = project_with_manifest("platforms = [\"ios\"]\n");
        let cache = project.path().join("Tuist").join("Dependencies");
        std::fs::create_dir_all(cache.join("Lockfiles")).unwrap();
        std::fs::write(cache.join("Lockfiles").join("Package.resolved"), "{}").unwrap();

        carton(&config)
            .arg("fetch")
            .arg("--project")
            .arg(project.path())
            .assert()
            .success();

        assert!(!cache.join("Lockfiles").join("Package.resolved").exists());
    }

    #[test]
    fn clean_empty_project_succeeds() {
        let config = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();

        carton(&config)
            .arg("clean")
            .arg("--project")
            .arg(project.path())
            .assert()
            .success();
    }

    #[test]
    fn clean_removes_cached_state() {
        let config = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        let spm = project.path().join("Deps").join("SwiftPackageManager");
        std::fs::create_dir_all(spm.join(".build")).unwrap();

        carton(&config)
            .args(["clean", "--cache-dir", "Deps", "--project"])
            .arg(project.path())
            .assert()
            .success();

        assert!(!spm.exists());
    }

    #[test]
    fn config_path() {
        let config = TempDir::new().unwrap();
        carton(&config)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let config = TempDir::new().unwrap();
        carton(&config)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[general]"))
            .stdout(predicate::str::contains("[fetch]"));
    }

    #[test]
    fn config_init_writes_file() {
        let config = TempDir::new().unwrap();
        carton(&config).args(["config", "init"]).assert().success();

        assert!(config.path().join("config.toml").exists());
    }

    #[test]
    fn invalid_config_reported() {
        let config = TempDir::new().unwrap();
        std::fs::write(config.path().join("config.toml"), "[general\n").unwrap();

        carton(&config)
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error:"));
    }
}
