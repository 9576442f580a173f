use qfix_lang::{Evaluator, DEFAULT_STACK_SIZE};

fn main() {
    let mut evaluator = Evaluator::with_constants(DEFAULT_STACK_SIZE);
    let mut status = 0;
    for expr in std::env::args().skip(1) {
        match evaluator.eval(&expr) {
            Ok(q) => println!("{}", q.format(&evaluator.conf)),
            Err(err) => {
                eprintln!("error: {}", err.message);
                status = 1;
            }
        }
    }
    std::process::exit(status);
}
