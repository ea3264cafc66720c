//! Destroy command integration tests.

use mockito::Matcher;
use predicates::prelude::*;

use super::common::{SCALE_SET_PATH, TestEnv};

#[test]
fn destroy_deletes_recorded_scale_set() {
  let mut server = mockito::Server::new();
  let delete = server
    .mock("DELETE", SCALE_SET_PATH)
    .match_query(Matcher::UrlEncoded("api-version".into(), "2016-03-30".into()))
    .with_status(202)
    .create();
  let get = server.mock("GET", Matcher::Any).expect(0).create();

  let env = TestEnv::new(&server.url());
  env.write_state(SCALE_SET_PATH);

  env
    .vmss_cmd("destroy")
    .assert()
    .success()
    .stdout(predicate::str::contains("Deletion requested"));

  delete.assert();
  get.assert();
  assert_eq!(env.state_id(), None);
}

#[test]
fn destroy_failure_keeps_identity() {
  let mut server = mockito::Server::new();
  let _delete = server
    .mock("DELETE", SCALE_SET_PATH)
    .match_query(Matcher::Any)
    .with_status(409)
    .with_body("Conflict")
    .create();

  let env = TestEnv::new(&server.url());
  env.write_state(SCALE_SET_PATH);

  env
    .vmss_cmd("destroy")
    .assert()
    .failure()
    .stderr(predicate::str::contains("HTTP 409"));

  assert_eq!(env.state_id().as_deref(), Some(SCALE_SET_PATH));
}

#[test]
fn destroy_is_idempotent() {
  let mut server = mockito::Server::new();
  let delete = server
    .mock("DELETE", SCALE_SET_PATH)
    .match_query(Matcher::Any)
    .with_status(202)
    .expect(1)
    .create();

  let env = TestEnv::new(&server.url());
  env.write_state(SCALE_SET_PATH);

  env.vmss_cmd("destroy").assert().success();
  env
    .vmss_cmd("destroy")
    .assert()
    .success()
    .stdout(predicate::str::contains("Nothing to destroy"));

  delete.assert();
}
