mod dfa;
mod nfa;
mod util;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn suite() -> Result<sct::ScannerTests> {
    let mut tests = sct::ScannerTests::new();
    macro_rules! load {
        ($name:expr) => {{
            const DATA: &[u8] =
                include_bytes!(concat!("data/", $name, ".toml"));
            tests.load_slice($name, DATA)?;
        }};
    }

    load!("alternation");
    load!("basic");
    load!("class");
    load!("errors");
    load!("escape");
    load!("repetition");

    Ok(tests)
}
