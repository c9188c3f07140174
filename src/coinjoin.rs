//! Merging of coinjoin transactions contributed by several participants.
//!
//! Each participant runs `generate-tx` and hands over the unsigned result.
//! `coinjoin-merge-unsigned` piles those into one shuffled transaction, which
//! every participant signs. `coinjoin-merge-signed` then folds the partial
//! signatures back into a single transaction.

use {
  super::*,
  bitcoin::secp256k1::rand::{self, seq::SliceRandom, Rng},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
  Signed,
  Unsigned,
}

#[derive(Debug, Snafu, PartialEq)]
#[snafu(context(suffix(false)))]
pub enum MergeError {
  #[snafu(display("duplicate input {outpoint}"))]
  DuplicateInput { outpoint: OutPoint },
  #[snafu(display("no transactions to merge"))]
  Empty,
  #[snafu(display("transaction {index} input {input} spends {actual}, expected {expected}"))]
  InputMismatch {
    index: usize,
    input: usize,
    expected: OutPoint,
    actual: OutPoint,
  },
  #[snafu(display("transaction {index} lock time {actual} does not match {expected}"))]
  LockTimeMismatch {
    index: usize,
    expected: LockTime,
    actual: LockTime,
  },
  #[snafu(display("transaction {index} output {output} does not match"))]
  OutputMismatch { index: usize, output: usize },
  #[snafu(display(
    "transaction {index} has {actual_inputs} inputs and {actual_outputs} outputs, \
     expected {expected_inputs} and {expected_outputs}"
  ))]
  ShapeMismatch {
    index: usize,
    expected_inputs: usize,
    expected_outputs: usize,
    actual_inputs: usize,
    actual_outputs: usize,
  },
  #[snafu(display("transaction {index} version {actual} does not match {expected}"))]
  VersionMismatch {
    index: usize,
    expected: i32,
    actual: i32,
  },
}

pub(crate) fn run(mode: Mode) -> SnafuResult {
  eprintln!(
    "Enter each {} raw transaction on a separate line, followed by a blank line or EOF to finish.",
    match mode {
      Mode::Signed => "partially-signed",
      Mode::Unsigned => "unsigned",
    }
  );

  let transactions = read_transactions(io::stdin().lock())?;

  log::info!("Merging {} transactions", transactions.len());

  let merged = match mode {
    Mode::Signed => merge_signed(&transactions),
    Mode::Unsigned => merge_unsigned(&transactions, &mut rand::thread_rng()),
  }
  .snafu_context(error::Merge)?;

  let (value, count) = most_popular_output(&merged);

  println!("mpo: {}", Decimal::from(value));

  if mode == Mode::Unsigned {
    println!("mpc: {count}");
  }

  println!("hex: {}", encode::serialize_hex(&merged));

  Ok(())
}

/// Reads hex transactions, one per line, until a blank line or EOF. Lines
/// that fail to decode are reported and skipped.
pub(crate) fn read_transactions(reader: impl BufRead) -> SnafuResult<Vec<Transaction>> {
  let mut transactions = Vec::new();

  for line in reader.lines() {
    let line = line.snafu_context(error::Stdin)?;
    let line = line.trim();

    if line.is_empty() {
      break;
    }

    match decode(line) {
      Ok(transaction) => transactions.push(transaction),
      Err(err) => eprintln!("err: failed to decode transaction: {err:#}"),
    }
  }

  Ok(transactions)
}

fn decode(hex: &str) -> Result<Transaction> {
  Ok(consensus::deserialize(&hex::decode(hex)?)?)
}

fn check_header(master: &Transaction, index: usize, tx: &Transaction) -> Result<(), MergeError> {
  if tx.version != master.version {
    return VersionMismatch {
      index,
      expected: master.version.0,
      actual: tx.version.0,
    }
    .fail();
  }

  if tx.lock_time != master.lock_time {
    return LockTimeMismatch {
      index,
      expected: master.lock_time,
      actual: tx.lock_time,
    }
    .fail();
  }

  Ok(())
}

/// Concatenates every input and output into one transaction with all
/// signatures removed, then shuffles inputs and outputs independently.
pub fn merge_unsigned(
  transactions: &[Transaction],
  rng: &mut impl Rng,
) -> Result<Transaction, MergeError> {
  let Some(first) = transactions.first() else {
    return Empty.fail();
  };

  let mut merged = Transaction {
    version: first.version,
    lock_time: first.lock_time,
    input: Vec::new(),
    output: Vec::new(),
  };

  let mut spent = BTreeSet::new();

  for (index, tx) in transactions.iter().enumerate() {
    check_header(&merged, index, tx)?;

    merged.output.extend(tx.output.iter().cloned());

    for input in &tx.input {
      if !spent.insert(input.previous_output) {
        return DuplicateInput {
          outpoint: input.previous_output,
        }
        .fail();
      }

      merged.input.push(TxIn {
        previous_output: input.previous_output,
        script_sig: ScriptBuf::new(),
        sequence: input.sequence,
        witness: Witness::new(),
      });
    }
  }

  merged.input.shuffle(rng);
  merged.output.shuffle(rng);

  Ok(merged)
}

/// Checks that every transaction is the first one modulo signatures, and
/// copies any signature found onto the first.
pub fn merge_signed(transactions: &[Transaction]) -> Result<Transaction, MergeError> {
  let Some(mut master) = transactions.first().cloned() else {
    return Empty.fail();
  };

  for (index, tx) in transactions.iter().enumerate() {
    check_header(&master, index, tx)?;

    if tx.input.len() != master.input.len() || tx.output.len() != master.output.len() {
      return ShapeMismatch {
        index,
        expected_inputs: master.input.len(),
        expected_outputs: master.output.len(),
        actual_inputs: tx.input.len(),
        actual_outputs: tx.output.len(),
      }
      .fail();
    }

    for (output, (theirs, ours)) in tx.output.iter().zip(&master.output).enumerate() {
      if theirs != ours {
        return OutputMismatch { index, output }.fail();
      }
    }

    for (input, (theirs, ours)) in tx.input.iter().zip(master.input.iter_mut()).enumerate() {
      if theirs.previous_output != ours.previous_output || theirs.sequence != ours.sequence {
        return InputMismatch {
          index,
          input,
          expected: ours.previous_output,
          actual: theirs.previous_output,
        }
        .fail();
      }

      if !theirs.script_sig.is_empty() {
        ours.script_sig = theirs.script_sig.clone();
      }

      if !theirs.witness.is_empty() {
        ours.witness = theirs.witness.clone();
      }
    }
  }

  Ok(master)
}

/// The most common output value and how many outputs carry it. Ties go to
/// the value with more trailing decimal zeros, then to the smaller value.
pub fn most_popular_output(tx: &Transaction) -> (Amount, usize) {
  let mut counts = BTreeMap::<Amount, usize>::new();

  for output in &tx.output {
    *counts.entry(output.value).or_default() += 1;
  }

  counts
    .into_iter()
    .max_by(|(a, a_count), (b, b_count)| {
      a_count
        .cmp(b_count)
        .then(roundness(*a).cmp(&roundness(*b)))
        .then(b.cmp(a))
    })
    .unwrap_or((Amount::ZERO, 0))
}

fn roundness(amount: Amount) -> u32 {
  let mut sat = amount.to_sat();
  let mut zeros = 0;

  while sat != 0 && sat % 10 == 0 {
    sat /= 10;
    zeros += 1;
  }

  zeros
}

#[cfg(test)]
mod tests {
  use {
    super::*,
    bitcoin::{script, transaction::Version, Sequence, TxOut},
  };

  fn output(sat: u64, tag: i64) -> TxOut {
    TxOut {
      value: Amount::from_sat(sat),
      script_pubkey: script::Builder::new().push_int(tag).into_script(),
    }
  }

  fn input(n: u64) -> TxIn {
    TxIn {
      previous_output: outpoint(n),
      script_sig: ScriptBuf::new(),
      sequence: Sequence::MAX,
      witness: Witness::new(),
    }
  }

  fn signed(n: u64) -> TxIn {
    TxIn {
      script_sig: script::Builder::new()
        .push_int(i64::try_from(n).unwrap() + 100)
        .into_script(),
      ..input(n)
    }
  }

  fn transaction(input: Vec<TxIn>, output: Vec<TxOut>) -> Transaction {
    Transaction {
      version: Version::TWO,
      lock_time: LockTime::ZERO,
      input,
      output,
    }
  }

  fn sorted<T: Clone, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> Vec<T> {
    let mut items = items.to_vec();
    items.sort_by_key(key);
    items
  }

  #[test]
  fn unsigned_merge_combines_everything() {
    let a = transaction(vec![signed(1), input(2)], vec![output(500_000, 1)]);
    let b = transaction(vec![input(3)], vec![output(500_000, 2), output(7, 3)]);

    let merged = merge_unsigned(&[a, b], &mut rand::thread_rng()).unwrap();

    assert_eq!(
      sorted(&merged.input, |input| input.previous_output),
      [input(1), input(2), input(3)],
    );

    assert_eq!(
      sorted(&merged.output, |output| output.script_pubkey.clone()),
      [output(500_000, 1), output(500_000, 2), output(7, 3)],
    );
  }

  #[test]
  fn unsigned_merge_strips_witnesses() {
    let mut a = transaction(vec![input(1)], vec![output(1, 1)]);
    a.input[0].witness = Witness::from_slice(&[vec![1u8, 2, 3]]);

    let merged = merge_unsigned(&[a], &mut rand::thread_rng()).unwrap();

    assert!(merged.input[0].witness.is_empty());
  }

  #[test]
  fn unsigned_merge_rejects_duplicate_inputs() {
    let a = transaction(vec![input(1)], vec![output(1, 1)]);
    let b = transaction(vec![input(2), input(1)], vec![output(1, 2)]);

    let err = merge_unsigned(&[a, b], &mut rand::thread_rng()).unwrap_err();

    assert_eq!(
      err,
      MergeError::DuplicateInput {
        outpoint: outpoint(1)
      }
    );

    assert_eq!(err.to_string(), format!("duplicate input {}", outpoint(1)));
  }

  #[test]
  fn unsigned_merge_rejects_mismatched_versions() {
    let a = transaction(vec![input(1)], vec![output(1, 1)]);
    let mut b = transaction(vec![input(2)], vec![output(1, 2)]);
    b.version = Version::ONE;

    assert_eq!(
      merge_unsigned(&[a, b], &mut rand::thread_rng())
        .unwrap_err()
        .to_string(),
      "transaction 1 version 1 does not match 2",
    );
  }

  #[test]
  fn unsigned_merge_rejects_mismatched_lock_times() {
    let a = transaction(vec![input(1)], vec![output(1, 1)]);
    let mut b = transaction(vec![input(2)], vec![output(1, 2)]);
    b.lock_time = LockTime::from_height(100).unwrap();

    assert_matches!(
      merge_unsigned(&[a, b], &mut rand::thread_rng()),
      Err(MergeError::LockTimeMismatch { index: 1, .. }),
    );
  }

  #[test]
  fn merging_nothing_is_an_error() {
    assert_eq!(
      merge_unsigned(&[], &mut rand::thread_rng()),
      Err(MergeError::Empty)
    );
    assert_eq!(merge_signed(&[]), Err(MergeError::Empty));
  }

  #[test]
  fn signed_merge_collects_signatures() {
    let unsigned = transaction(
      vec![input(1), input(2), input(3)],
      vec![output(500_000, 1), output(500_000, 2)],
    );

    let mut alice = unsigned.clone();
    alice.input[0] = signed(1);

    let mut bob = unsigned.clone();
    bob.input[2] = signed(3);
    bob.input[1].witness = Witness::from_slice(&[vec![4u8, 5, 6]]);

    let merged = merge_signed(&[unsigned.clone(), alice, bob]).unwrap();

    assert_eq!(merged.input[0], signed(1));
    assert_eq!(merged.input[1].witness, Witness::from_slice(&[vec![4u8, 5, 6]]));
    assert_eq!(merged.input[2], signed(3));
    assert_eq!(merged.output, unsigned.output);
  }

  #[test]
  fn signed_merge_rejects_different_outputs() {
    let a = transaction(vec![input(1)], vec![output(500_000, 1)]);
    let b = transaction(vec![input(1)], vec![output(400_000, 1)]);

    assert_eq!(
      merge_signed(&[a, b]),
      Err(MergeError::OutputMismatch {
        index: 1,
        output: 0
      })
    );
  }

  #[test]
  fn signed_merge_rejects_different_inputs() {
    let a = transaction(vec![input(1)], vec![output(500_000, 1)]);
    let b = transaction(vec![input(2)], vec![output(500_000, 1)]);

    assert_eq!(
      merge_signed(&[a, b]),
      Err(MergeError::InputMismatch {
        index: 1,
        input: 0,
        expected: outpoint(1),
        actual: outpoint(2),
      })
    );
  }

  #[test]
  fn signed_merge_rejects_different_shapes() {
    let a = transaction(vec![input(1)], vec![output(500_000, 1)]);
    let b = transaction(vec![input(1), input(2)], vec![output(500_000, 1)]);

    assert_eq!(
      merge_signed(&[a, b]).unwrap_err().to_string(),
      "transaction 1 has 2 inputs and 1 outputs, expected 1 and 1",
    );
  }

  #[test]
  fn most_popular_output_counts() {
    let tx = transaction(
      Vec::new(),
      vec![
        output(500_000, 1),
        output(123, 2),
        output(500_000, 3),
        output(191_000, 4),
      ],
    );

    assert_eq!(most_popular_output(&tx), (Amount::from_sat(500_000), 2));
  }

  #[test]
  fn most_popular_output_prefers_rounder_values() {
    let tx = transaction(
      Vec::new(),
      vec![output(123_456, 1), output(1_000_000, 2), output(7_000, 3)],
    );

    assert_eq!(most_popular_output(&tx), (Amount::from_sat(1_000_000), 1));
  }

  #[test]
  fn most_popular_output_breaks_remaining_ties_by_size() {
    let tx = transaction(Vec::new(), vec![output(300, 1), output(200, 2)]);

    assert_eq!(most_popular_output(&tx), (Amount::from_sat(200), 1));
  }

  #[test]
  fn most_popular_output_of_nothing() {
    assert_eq!(
      most_popular_output(&transaction(Vec::new(), Vec::new())),
      (Amount::ZERO, 0)
    );
  }

  #[test]
  fn read_transactions_stops_at_blank_line() {
    let a = transaction(vec![input(1)], vec![output(1, 1)]);
    let b = transaction(vec![input(2)], vec![output(2, 2)]);

    let stdin = format!(
      "{}\n  {}  \n\n{}\n",
      encode::serialize_hex(&a),
      encode::serialize_hex(&b),
      encode::serialize_hex(&a),
    );

    assert_eq!(read_transactions(stdin.as_bytes()).unwrap(), [a, b]);
  }

  #[test]
  fn read_transactions_skips_garbage() {
    let a = transaction(vec![input(1)], vec![output(1, 1)]);

    let stdin = format!("zz\n0200\n{}", encode::serialize_hex(&a));

    assert_eq!(read_transactions(stdin.as_bytes()).unwrap(), [a]);
  }
}
