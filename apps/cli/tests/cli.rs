use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SIZE_M: &str = "<Attributes><ProductAttribute ID=\"10\"><ProductAttributeValue><Value>101</Value>\
                      </ProductAttributeValue></ProductAttribute></Attributes>";

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

/// Runs the binary in an empty directory so no stray settings file is picked up.
fn storefront(workdir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("storefront").unwrap();
    cmd.current_dir(workdir.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn no_arguments_prints_help() {
    let dir = tempfile::tempdir().unwrap();
    storefront(&dir).assert().failure().stderr(predicate::str::contains("Usage"));
}

#[test]
fn add_builds_a_document_from_scratch() {
    let dir = tempfile::tempdir().unwrap();
    storefront(&dir)
        .args(["attrs", "add", "--mapping", "10", "--value", "101"])
        .assert()
        .success()
        .stdout(format!("{SIZE_M}\n"));
}

#[test]
fn ids_and_values_read_a_document() {
    let dir = tempfile::tempdir().unwrap();
    storefront(&dir).args(["attrs", "ids", SIZE_M]).assert().success().stdout("10\n");
    storefront(&dir).args(["attrs", "values", SIZE_M, "--mapping", "10"]).assert().success().stdout("101\n");
}

#[test]
fn documents_can_come_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    storefront(&dir).args(["attrs", "ids", "-"]).write_stdin(SIZE_M).assert().success().stdout("10\n");
}

#[test]
fn equal_ignores_value_order() {
    let dir = tempfile::tempdir().unwrap();
    let a = "<Attributes><ProductAttribute ID=\"1\"><ProductAttributeValue><Value>a</Value></ProductAttributeValue>\
             <ProductAttributeValue><Value>b</Value></ProductAttributeValue></ProductAttribute></Attributes>";
    let b = "<Attributes><ProductAttribute ID=\"1\"><ProductAttributeValue><Value>b</Value></ProductAttributeValue>\
             <ProductAttributeValue><Value> a </Value></ProductAttributeValue></ProductAttribute></Attributes>";
    storefront(&dir).args(["attrs", "equal", a, b]).assert().success().stdout("true\n");
    storefront(&dir).args(["attrs", "equal", a, SIZE_M]).assert().success().stdout("false\n");
}

#[test]
fn malformed_documents_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    storefront(&dir)
        .args(["attrs", "ids", "<Attributes><oops>"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read attribute ids"));
}

#[test]
fn gift_card_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let output = storefront(&dir)
        .args(["gift-card", "add", SIZE_M, "--recipient-name", " Ann ", "--message", "Enjoy"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let xml = String::from_utf8(output.stdout).unwrap();
    assert!(xml.contains("<GiftCardInfo>"));

    storefront(&dir)
        .args(["gift-card", "read", xml.trim_end()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"recipient_name\": \"Ann\"").and(predicate::str::contains("\"message\": \"Enjoy\"")));
}

#[test]
fn combinations_lists_every_document() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = fixture("catalog.toml");
    let output = storefront(&dir)
        .args(["combinations", "--product", "1", "--catalog"])
        .arg(&catalog)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap().lines().count(), 26);
}

#[test]
fn combinations_respects_the_limit() {
    let dir = tempfile::tempdir().unwrap();
    storefront(&dir)
        .args(["combinations", "--product", "1", "--limit", "5", "--catalog"])
        .arg(fixture("catalog.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("limit of 5 exceeded"));
}

#[test]
fn combinations_finds_the_stored_combination() {
    let dir = tempfile::tempdir().unwrap();
    storefront(&dir)
        .args(["combinations", "--product", "1", "--match"])
        .arg("<Attributes><ProductAttribute ID=\"10\"><ProductAttributeValue><Value>100</Value></ProductAttributeValue></ProductAttribute></Attributes>")
        .arg("--catalog")
        .arg(fixture("catalog.toml"))
        .assert()
        .success()
        .stdout("1001\t\n");

    storefront(&dir)
        .args(["combinations", "--product", "9", "--catalog"])
        .arg(fixture("catalog.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Product 9"));
}

#[test]
fn quote_lists_rates_per_method() {
    let dir = tempfile::tempdir().unwrap();
    storefront(&dir)
        .args(["quote", "--item", "20.00x2", "--country", "1", "--zip", "12345", "--rates"])
        .arg(fixture("rates.toml"))
        .assert()
        .success()
        .stdout(
            predicate::str::is_match(r"^Ground\t4(\.0+)?\nNext Day Air\t19\.95\nPickup\t0(\.0+)?\n$").unwrap(),
        );
}

#[test]
fn strict_mode_from_the_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("strict.toml");
    fs::write(&settings, "[shipping]\nlimit_methods_to_created = true\n").unwrap();

    storefront(&dir)
        .args(["quote", "--item", "20.00x2", "--country", "1", "--config"])
        .arg(&settings)
        .arg("--rates")
        .arg(fixture("rates.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Pickup").not());
}

#[test]
fn quote_without_items_or_address_fails() {
    let dir = tempfile::tempdir().unwrap();
    storefront(&dir)
        .args(["quote", "--country", "1", "--rates"])
        .arg(fixture("rates.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No shipment items"));

    storefront(&dir)
        .args(["quote", "--item", "5", "--no-address", "--rates"])
        .arg(fixture("rates.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Shipping address is not set"));
}

#[test]
fn unknown_log_level_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    storefront(&dir)
        .env("STOREFRONT__LOGGING__LEVEL", "chatty")
        .args(["attrs", "ids", SIZE_M])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown log level 'chatty'"));
}
