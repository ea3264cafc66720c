//! Apply command integration tests.

use mockito::Matcher;
use predicates::prelude::*;

use super::common::{SCALE_SET_PATH, TestEnv, fixture_path, remote_body};

#[test]
fn apply_records_identity_when_provisioned() {
  let mut server = mockito::Server::new();
  let put = server
    .mock("PUT", SCALE_SET_PATH)
    .match_query(Matcher::UrlEncoded("api-version".into(), "2016-03-30".into()))
    .match_header("authorization", "Bearer test-token")
    .match_body(Matcher::PartialJson(serde_json::json!({
      "location": "West US",
      "sku": { "name": "Standard_A0", "tier": "Standard", "capacity": 2 },
      "properties": { "upgradePolicy": { "mode": "Manual" } }
    })))
    .with_status(201)
    .with_body(remote_body("Creating"))
    .create();
  let get = server
    .mock("GET", SCALE_SET_PATH)
    .match_query(Matcher::Any)
    .with_status(200)
    .with_body(remote_body("Succeeded"))
    .create();

  let env = TestEnv::new(&server.url());
  env
    .vmss_cmd("apply")
    .arg(fixture_path("spec.yaml"))
    .assert()
    .success()
    .stdout(predicate::str::contains("Scale set 'vmss1' is available"))
    .stdout(predicate::str::contains(SCALE_SET_PATH));

  put.assert();
  get.assert();
  assert_eq!(env.state_id().as_deref(), Some(SCALE_SET_PATH));
}

#[test]
fn apply_json_output_reports_state() {
  let mut server = mockito::Server::new();
  let _put = server
    .mock("PUT", SCALE_SET_PATH)
    .match_query(Matcher::Any)
    .with_status(201)
    .with_body(remote_body("Creating"))
    .create();
  let _get = server
    .mock("GET", SCALE_SET_PATH)
    .match_query(Matcher::Any)
    .with_status(200)
    .with_body(remote_body("Succeeded"))
    .create();

  let env = TestEnv::new(&server.url());
  let output = env
    .vmss_cmd("apply")
    .arg(fixture_path("spec.yaml"))
    .arg("-o")
    .arg("json")
    .output()
    .unwrap();

  assert!(output.status.success());
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["id"], SCALE_SET_PATH);
  assert_eq!(json["provisioning_state"], "Succeeded");
  assert_eq!(json["polls"], 1);
}

#[test]
fn failed_provisioning_keeps_identity() {
  let mut server = mockito::Server::new();
  let _put = server
    .mock("PUT", SCALE_SET_PATH)
    .match_query(Matcher::Any)
    .with_status(201)
    .with_body(remote_body("Creating"))
    .create();
  let get = server
    .mock("GET", SCALE_SET_PATH)
    .match_query(Matcher::Any)
    .with_status(200)
    .with_body(remote_body("Failed"))
    .expect(1)
    .create();

  let env = TestEnv::new(&server.url());
  env
    .vmss_cmd("apply")
    .arg(fixture_path("spec.yaml"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("unexpected provisioning state 'Failed'"))
    .stderr(predicate::str::contains("vmss destroy"));

  get.assert();
  assert_eq!(env.state_id().as_deref(), Some(SCALE_SET_PATH));
}

#[test]
fn pending_past_timeout_keeps_identity() {
  let mut server = mockito::Server::new();
  let _put = server
    .mock("PUT", SCALE_SET_PATH)
    .match_query(Matcher::Any)
    .with_status(201)
    .with_body(remote_body("Creating"))
    .create();
  let _get = server
    .mock("GET", SCALE_SET_PATH)
    .match_query(Matcher::Any)
    .with_status(200)
    .with_body(remote_body("Creating"))
    .create();

  let env = TestEnv::with_timeout(&server.url(), "100ms");
  env
    .vmss_cmd("apply")
    .arg(fixture_path("spec.yaml"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("timed out"));

  assert_eq!(env.state_id().as_deref(), Some(SCALE_SET_PATH));
}

#[test]
fn unsaved_state_still_reports_provisioning_failure() {
  let mut server = mockito::Server::new();
  let _put = server
    .mock("PUT", SCALE_SET_PATH)
    .match_query(Matcher::Any)
    .with_status(201)
    .with_body(remote_body("Creating"))
    .create();
  let _get = server
    .mock("GET", SCALE_SET_PATH)
    .match_query(Matcher::Any)
    .with_status(200)
    .with_body(remote_body("Failed"))
    .create();

  let env = TestEnv::new(&server.url());
  // The state file's temp path is taken by a directory, so saving fails.
  let mut temp_path = env.state_path().as_os_str().to_owned();
  temp_path.push(".tmp");
  std::fs::create_dir(&temp_path).unwrap();

  env
    .vmss_cmd("apply")
    .arg(fixture_path("spec.yaml"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to save state"))
    .stderr(predicate::str::contains("unexpected provisioning state 'Failed'"));

  assert_eq!(env.state_id(), None);
}

#[test]
fn rejected_submit_records_nothing() {
  let mut server = mockito::Server::new();
  let _put = server
    .mock("PUT", SCALE_SET_PATH)
    .match_query(Matcher::Any)
    .with_status(400)
    .with_body("InvalidParameter")
    .create();
  let get = server.mock("GET", SCALE_SET_PATH).match_query(Matcher::Any).expect(0).create();

  let env = TestEnv::new(&server.url());
  env
    .vmss_cmd("apply")
    .arg(fixture_path("spec.yaml"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("HTTP 400"))
    .stderr(predicate::str::contains("InvalidParameter"));

  get.assert();
  assert_eq!(env.state_id(), None);
}

#[test]
fn invalid_spec_makes_no_request() {
  let mut server = mockito::Server::new();
  let put = server.mock("PUT", Matcher::Any).expect(0).create();

  let env = TestEnv::new(&server.url());
  env
    .vmss_cmd("apply")
    .arg(fixture_path("two_skus.yaml"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("exactly one sku required"));

  put.assert();
  assert!(!env.state_path().exists());
}
