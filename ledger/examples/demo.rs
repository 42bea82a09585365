//! CLI walkthrough of the OPAL transaction lifecycle.
//!
//! Creates identities, builds and signs a CREATE transaction, shows the
//! canonical wire form, then chains a TRANSFER and validates it against
//! the spent condition.
//!
//! Run with:
//!   cargo run --example demo

use opal_ledger::crypto::keys::OpalKeypair;
use opal_ledger::transaction::{Metadata, OwnerSpec, Transaction};

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

fn step(n: u32, title: &str) {
    println!();
    println!("{BOLD}{CYAN}[{n}]{RESET} {BOLD}{title}{RESET}");
}

fn main() {
    println!("{BOLD}OPAL Ledger — transaction model walkthrough{RESET}");

    step(1, "Identities");
    let alice = OpalKeypair::generate();
    let bob = OpalKeypair::generate();
    let carol = OpalKeypair::generate();
    println!("  alice  {DIM}{}{RESET}", alice.public_key());
    println!("  bob    {DIM}{}{RESET}", bob.public_key());
    println!("  carol  {DIM}{}{RESET}", carol.public_key());

    step(2, "Alice creates a widget for Bob");
    let mut payload = serde_json::Map::new();
    payload.insert("title".to_string(), serde_json::json!("widget"));
    let mut create = Transaction::create(
        &[alice.public_key()],
        &[OwnerSpec::Key(bob.public_key())],
        Some(Metadata::new(Some(payload))),
        None,
        None,
        None,
    )
    .expect("create transaction");
    create.sign(&[alice.clone()]).expect("sign create");
    println!("  id        {}", create.compute_id());
    println!(
        "  valid     {GREEN}{}{RESET}",
        create.fulfillments_valid(None).unwrap()
    );

    step(3, "Canonical wire form");
    let wire = create.to_canonical_string();
    println!("  {} bytes of canonical JSON", wire.len());
    println!("  {DIM}{}{RESET}", &wire[..wire.len().min(120)]);

    step(4, "Decode verifies the identifier before trusting anything");
    let decoded =
        Transaction::from_canonical(&serde_json::from_str(&wire).unwrap()).expect("decode");
    println!("  decoded == built: {}", decoded == create);

    step(5, "Bob transfers the widget to Carol");
    let mut transfer = Transaction::transfer(
        create.to_inputs(),
        &[vec![OwnerSpec::Key(carol.public_key())]],
        create.asset.clone(),
        None,
    )
    .expect("transfer transaction");
    transfer.sign(&[bob.clone()]).expect("sign transfer");
    println!("  id        {}", transfer.compute_id());
    println!(
        "  valid against spent condition: {GREEN}{}{RESET}",
        transfer
            .fulfillments_valid(Some(&create.conditions))
            .unwrap()
    );

    println!();
    println!("{BOLD}Done.{RESET}");
}
