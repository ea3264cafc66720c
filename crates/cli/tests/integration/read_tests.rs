//! Read command integration tests.

use mockito::Matcher;
use predicates::prelude::*;

use super::common::{SCALE_SET_PATH, TestEnv, fixture_path, remote_body};

fn serve_scale_set(server: &mut mockito::Server) -> mockito::Mock {
  server
    .mock("GET", SCALE_SET_PATH)
    .match_query(Matcher::Any)
    .with_status(200)
    .with_body(remote_body("Succeeded"))
    .create()
}

#[test]
fn read_prints_remote_scale_set() {
  let mut server = mockito::Server::new();
  let get = serve_scale_set(&mut server);

  let env = TestEnv::new(&server.url());
  env.write_state(SCALE_SET_PATH);

  env
    .vmss_cmd("read")
    .assert()
    .success()
    .stdout(predicate::str::contains("Scale set 'vmss1'"))
    .stdout(predicate::str::contains("westus"))
    .stdout(predicate::str::contains("Standard_A0"));

  get.assert();
}

#[test]
fn read_json_contains_flattened_spec() {
  let mut server = mockito::Server::new();
  let _get = serve_scale_set(&mut server);

  let env = TestEnv::new(&server.url());
  env.write_state(SCALE_SET_PATH);

  let output = env.vmss_cmd("read").arg("-o").arg("json").output().unwrap();

  assert!(output.status.success());
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["exists"], true);
  assert_eq!(json["spec"]["name"], "vmss1");
  assert_eq!(json["spec"]["resource_group_name"], "rg1");
  assert_eq!(json["spec"]["upgrade_policy_mode"], "Manual");
}

#[test]
fn read_with_matching_spec_reports_no_drift() {
  let mut server = mockito::Server::new();
  let _get = serve_scale_set(&mut server);

  let env = TestEnv::new(&server.url());
  env.write_state(SCALE_SET_PATH);

  env
    .vmss_cmd("read")
    .arg("--spec")
    .arg(fixture_path("spec.yaml"))
    .assert()
    .success()
    .stdout(predicate::str::contains("No drift detected"));
}

#[test]
fn read_with_scaled_spec_reports_sku_drift() {
  let mut server = mockito::Server::new();
  let _get = serve_scale_set(&mut server);

  let env = TestEnv::new(&server.url());
  env.write_state(SCALE_SET_PATH);

  let output = env
    .vmss_cmd("read")
    .arg("--spec")
    .arg(fixture_path("spec_scaled.yaml"))
    .arg("-o")
    .arg("json")
    .output()
    .unwrap();

  assert!(output.status.success());
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["drifted"], true);
  assert_eq!(json["requires_replacement"], false);
  assert_eq!(json["diff"]["sku"]["added"].as_array().unwrap().len(), 1);
  assert_eq!(json["diff"]["sku"]["removed"].as_array().unwrap().len(), 1);
}

#[test]
fn read_of_deleted_scale_set_clears_identity() {
  let mut server = mockito::Server::new();
  let _get = server
    .mock("GET", SCALE_SET_PATH)
    .match_query(Matcher::Any)
    .with_status(404)
    .create();

  let env = TestEnv::new(&server.url());
  env.write_state(SCALE_SET_PATH);

  env
    .vmss_cmd("read")
    .assert()
    .success()
    .stderr(predicate::str::contains("no longer exists"));

  assert_eq!(env.state_id(), None);
}
