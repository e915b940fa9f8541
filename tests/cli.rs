use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::TempDir;

fn app_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join(".php.fpm.bp")).unwrap();
    dir
}

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("php-nginx-config").unwrap();
    cmd.env_remove("BP_PHP_WEB_DIR")
        .env_remove("BP_PHP_ENABLE_HTTPS_REDIRECT")
        .env_remove("BP_LOG_LEVEL")
        .env_remove("RUST_LOG");
    cmd
}

fn mode_of(path: &Path) -> u32 {
    fs::metadata(path).unwrap().permissions().mode() & 0o7777
}

#[test]
fn generate_writes_both_files_into_layer() {
    let app = app_dir();
    let layer = tempfile::tempdir().unwrap();
    let nginx_conf = layer.path().join("nginx.conf");
    let fpm_conf = app.path().join(".php.fpm.bp").join("nginx-fpm.conf");

    cmd()
        .arg("generate")
        .arg("--working-dir")
        .arg(app.path())
        .arg("--layer-path")
        .arg(layer.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("PHP_NGINX_PATH={}", nginx_conf.display())));

    let socket = layer.path().join("php-fpm.socket");
    let nginx = fs::read_to_string(&nginx_conf).unwrap();
    assert!(nginx.contains(&format!("root {}/htdocs;", app.path().display())));
    assert!(nginx.contains(r#"listen {{env "PORT"}} default_server;"#));
    assert!(nginx.contains(&format!("server unix:{};", socket.display())));
    assert!(fs::read_to_string(&fpm_conf)
        .unwrap()
        .contains(&format!("listen = {}", socket.display())));

    assert_eq!(mode_of(&nginx_conf) & 0o060, 0o060);
    assert_eq!(mode_of(&fpm_conf) & 0o040, 0o040);
}

#[test]
fn generate_json_output() {
    let app = app_dir();

    let output = cmd()
        .args(["generate", "--output", "json", "--working-dir"])
        .arg(app.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        report["nginx_conf"],
        app.path().join("nginx.conf").display().to_string()
    );
    assert_eq!(
        report["fpm_conf"],
        app.path().join(".php.fpm.bp/nginx-fpm.conf").display().to_string()
    );
}

#[test]
fn generate_rejects_unparseable_redirect_flag() {
    let app = app_dir();

    cmd()
        .env("BP_PHP_ENABLE_HTTPS_REDIRECT", "blah")
        .arg("generate")
        .arg("--working-dir")
        .arg(app.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("BP_PHP_ENABLE_HTTPS_REDIRECT"));

    assert!(!app.path().join("nginx.conf").exists());
}

#[test]
fn render_nginx_includes_user_fragments() {
    let app = app_dir();
    let fragments = app.path().join(".nginx.conf.d");
    fs::create_dir(&fragments).unwrap();
    fs::write(fragments.join("some-server.conf"), "").unwrap();

    cmd()
        .env("BP_PHP_WEB_DIR", "public")
        .args(["render", "nginx", "--working-dir"])
        .arg(app.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "include {}/*-server.conf;",
            fragments.display()
        )))
        .stdout(predicate::str::contains(format!("root {}/public;", app.path().display())))
        .stdout(predicate::str::contains("-http.conf").not());

    assert!(!app.path().join("nginx.conf").exists());
}

#[test]
fn render_fpm_uses_tmp_socket_without_layer() {
    let app = app_dir();

    cmd()
        .args(["render", "fpm", "--working-dir"])
        .arg(app.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("listen = /tmp/php-fpm.socket"));
}

#[test]
fn render_with_custom_templates() {
    let app = app_dir();
    let templates = tempfile::tempdir().unwrap();
    fs::write(templates.path().join("nginx.conf"), "root {{app_root}}/{{web_directory}};\n").unwrap();
    fs::write(templates.path().join("nginx-fpm.conf"), "listen = {{fpm_socket}}\n").unwrap();

    cmd()
        .args(["render", "nginx", "--working-dir"])
        .arg(app.path())
        .arg("--templates-dir")
        .arg(templates.path())
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("root {}/htdocs;\n", app.path().display())));
}

#[test]
fn config_check_reports_errors() {
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("settings.toml");
    fs::write(
        &settings,
        format!(
            "[generator]\nworking_dir = \"{}\"\n\n[logging]\nlevel = \"loud\"\n",
            dir.path().display()
        ),
    )
    .unwrap();

    cmd()
        .args(["config", "check", "--config"])
        .arg(&settings)
        .assert()
        .failure()
        .stdout(predicate::str::contains("[X] Invalid log level: loud"));
}

#[test]
fn config_init_then_check() {
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("php-nginx-config.toml");

    cmd()
        .args(["config", "init", "--config"])
        .arg(&settings)
        .assert()
        .success();

    cmd()
        .args(["config", "init", "--config"])
        .arg(&settings)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let written = fs::read_to_string(&settings).unwrap();
    assert!(written.contains("[generator]"));
    assert!(written.contains("[logging]"));
}
