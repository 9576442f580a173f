use qfix_core::Q;

// Prints the kernel determinism probe in diff-friendly form: one line
// per operation with the observed and pinned raw words, then a blake3
// digest of the observed sequence for quick cross-host comparison.
fn main() {
    const LABELS: [&str; 8] = [
        "add", "sub", "mul", "div", "fma", "neg", "floor", "round",
    ];

    let observed = Q::determinism_vector_v1();
    let pinned = Q::DETERMINISM_VECTOR_V1_EXPECTED;

    let mut digest = blake3::Hasher::new();
    let mut mismatched = 0usize;
    for ((label, got), want) in LABELS.iter().zip(observed).zip(pinned) {
        digest.update(&got.to_le_bytes());
        let mark = if got == want {
            "ok"
        } else {
            mismatched += 1;
            "MISMATCH"
        };
        println!("{label:>6}  raw={got:#010x}  pinned={want:#010x}  {mark}");
    }

    println!("digest  blake3={}", digest.finalize().to_hex());
    if mismatched == 0 {
        println!("result  pass");
    } else {
        println!("result  fail ({mismatched} of {} mismatched)", LABELS.len());
        std::process::exit(2);
    }
}
