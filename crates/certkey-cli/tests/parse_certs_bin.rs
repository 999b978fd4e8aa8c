use std::{
    ffi::OsString,
    process::{Command, Output},
};

use ssh_key::{
    Algorithm, PrivateKey,
    certificate::{Builder, CertType},
    rand_core::OsRng,
};

fn run(args: &[&str]) -> Output {
    run_os(args.iter().map(OsString::from).collect())
}

fn run_os(args: Vec<OsString>) -> Output {
    Command::new(env!("CARGO_BIN_EXE_parse-certs"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn parse-certs")
}

fn issue_cert() -> (PrivateKey, PrivateKey, String) {
    let subject = PrivateKey::random(&mut OsRng, Algorithm::Ed25519).expect("subject key");
    let ca = PrivateKey::random(&mut OsRng, Algorithm::Ed25519).expect("ca key");
    let mut builder = Builder::new_with_random_nonce(
        &mut OsRng,
        subject.public_key().key_data().clone(),
        1_700_000_000,
        1_700_086_400,
    )
    .expect("builder");
    builder.cert_type(CertType::User).expect("cert type");
    builder.valid_principal("alice").expect("principal");
    builder.valid_principal("ops").expect("principal");
    let line = builder.sign(&ca).expect("sign").to_openssh().expect("encode");
    (subject, ca, line)
}

#[test]
fn prints_fields_and_exits_zero() {
    let (subject, ca, line) = issue_cert();
    let output = run(&[line.as_str()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let expected = format!(
        "{}\n{}\nalice;ops\n1700000000\n1700086400\n",
        subject.public_key().to_openssh().expect("encode"),
        ca.public_key().to_openssh().expect("encode"),
    );
    assert_eq!(String::from_utf8_lossy(&output.stdout), expected);
}

#[test]
fn bare_public_key_fails_without_output() {
    let key = PrivateKey::random(&mut OsRng, Algorithm::Ed25519).expect("generate");
    let line = key.public_key().to_openssh().expect("encode");
    let output = run(&[line.as_str()]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("expected an SSH certificate"));
}

#[test]
fn trailing_garbage_fails() {
    let (_, _, line) = issue_cert();
    let input = format!("{line}\ntrailing");
    let output = run(&[input.as_str()]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unexpected data after key"));
}

#[test]
fn invalid_input_fails() {
    let output = run(&["ssh-ed25519-cert-v01@openssh.com %%%%"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no key found"));
}

#[test]
fn missing_argument_fails() {
    let output = run(&[]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn help_flags_are_decoded_and_rejected() {
    for flag in ["-h", "--help"] {
        let output = run(&[flag]);
        assert!(!output.status.success(), "{flag} should fail");
        assert!(output.stdout.is_empty(), "{flag} should print nothing");
        assert!(String::from_utf8_lossy(&output.stderr).contains("no key found"));
    }
}

#[cfg(unix)]
#[test]
fn non_utf8_comment_is_accepted() {
    use std::os::unix::ffi::OsStringExt;

    let (_, _, line) = issue_cert();
    let mut bytes = line.into_bytes();
    bytes.extend_from_slice(b" \xff\xfe");
    let output = run_os(vec![OsString::from_vec(bytes)]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout).lines().nth(2), Some("alice;ops"));
}
