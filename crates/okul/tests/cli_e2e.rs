#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn okul(data: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("okul"));
    cmd.env_remove("OKUL_DATA")
        .env_remove("RUST_LOG")
        .arg("--data")
        .arg(data);
    cmd
}

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.arg("--output").arg("json").output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn pages_lists_every_route() {
    let temp = TempDir::new().unwrap();
    okul(temp.path())
        .arg("pages")
        .assert()
        .success()
        .stdout(predicate::str::contains("/fiyat-bilgileri"))
        .stdout(predicate::str::contains("/hakkimizda"));
}

#[test]
fn saved_faq_appears_on_rendered_page() {
    let temp = TempDir::new().unwrap();
    okul(temp.path())
        .args([
            "set",
            "pricing",
            "faq",
            "--text",
            r#"[{"question":"Q1","answer":"A1"}]"#,
        ])
        .assert()
        .success();

    okul(temp.path())
        .args(["render", "/fiyat-bilgileri"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Q: Q1"))
        .stdout(predicate::str::contains("A: A1"));

    let rendered = json_output(okul(temp.path()).args(["render", "pricing"]));
    let faq = rendered["page"]["sections"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["id"] == "faq")
        .unwrap()
        .clone();
    assert_eq!(faq["is_default"], Value::Bool(false));
    assert_eq!(faq["content"]["value"][0]["question"], "Q1");
}

#[test]
fn malformed_structured_content_is_rejected() {
    let temp = TempDir::new().unwrap();
    okul(temp.path())
        .args(["set", "about", "values", "--text", "not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn missing_section_renders_default() {
    let temp = TempDir::new().unwrap();
    okul(temp.path())
        .args(["set", "about", "history", "--text", "<p>1998</p>"])
        .assert()
        .success();

    let rendered = json_output(okul(temp.path()).args(["render", "/hakkimizda"]));
    let values = rendered["page"]["sections"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["id"] == "values")
        .unwrap()
        .clone();
    assert_eq!(values["is_default"], Value::Bool(true));
    assert!(!values["content"]["value"].as_array().unwrap().is_empty());
}

#[test]
fn teacher_image_is_removed_with_the_teacher() {
    let temp = TempDir::new().unwrap();
    let photo = temp.path().join("ayse.jpg");
    fs::write(&photo, [0xFF, 0xD8, 0xFF]).unwrap();

    let created = json_output(okul(temp.path()).args([
        "add",
        "teacher",
        "-f",
        "name=Ayşe Kaya",
        "-f",
        "title=Sınıf Öğretmeni",
        "--image",
        photo.to_str().unwrap(),
    ]));
    let id = created["affected"][0]["id"].as_str().unwrap().to_string();
    let public_id = created["affected"][0]["imagePublicId"]
        .as_str()
        .unwrap()
        .to_string();
    let stored = temp.path().join("uploads").join(&public_id);
    assert!(stored.exists());

    okul(temp.path())
        .args(["list", "teachers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ayşe Kaya"));

    okul(temp.path())
        .args(["delete", "teacher", &id])
        .assert()
        .success();
    assert!(!stored.exists());

    let listed = json_output(okul(temp.path()).args(["list", "teachers"]));
    assert!(listed["listed"].as_array().unwrap().is_empty());
}

#[test]
fn contact_message_status_changes() {
    let temp = TempDir::new().unwrap();
    let created = json_output(okul(temp.path()).args([
        "add",
        "message",
        "-f",
        "name=Veli",
        "-f",
        "email=veli@example.com",
        "-f",
        "message=Kayıt hakkında bilgi",
    ]));
    assert_eq!(created["affected"][0]["status"], "new");
    let id = created["affected"][0]["id"].as_str().unwrap().to_string();

    let updated = json_output(okul(temp.path()).args(["status", &id, "replied"]));
    assert_eq!(updated["affected"][0]["status"], "replied");
}

#[test]
fn empty_admin_email_makes_store_read_only() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("okul.toml"), "admin_email = \"\"\n").unwrap();

    okul(temp.path())
        .args(["add", "event", "-f", "title=Şenlik", "-f", "date=2024-05-10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"));

    okul(temp.path()).args(["render", "/"]).assert().success();
}

#[test]
fn config_reads_site_name() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("okul.toml"), "site_name = \"Minik Adımlar\"\n").unwrap();

    okul(temp.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("site_name = \"Minik Adımlar\""));

    let rendered = json_output(okul(temp.path()).args(["render", "/galeri"]));
    assert_eq!(rendered["page"]["meta"]["title"], "Galeri | Minik Adımlar");
}

#[test]
fn unknown_page_fails() {
    let temp = TempDir::new().unwrap();
    okul(temp.path())
        .args(["sections", "blog"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown page"));
}
