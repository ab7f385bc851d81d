use pretty_assertions::assert_eq;
use ropfix::driver::rewrite;
use std::path::PathBuf;
use test_generator::test_resources;

fn run_rewrite_test(file: &str) {
    println!("RUNNING '{file}'...");

    let source = std::fs::read(file).unwrap();
    let expected = std::fs::read_to_string(PathBuf::from(file).with_extension("txt")).unwrap();

    let output = rewrite(&source).unwrap().output;
    assert_eq!(String::from_utf8(output).unwrap(), expected);
}

#[test_resources("tests/data/*.s")]
fn test_rewrite(path: &str) {
    run_rewrite_test(path);
}

#[test_resources("tests/data/*.s")]
fn test_rewrite_is_stable(path: &str) {
    let once = rewrite(&std::fs::read(path).unwrap()).unwrap().output;
    let twice = rewrite(&once).unwrap().output;

    assert_eq!(String::from_utf8(twice).unwrap(), String::from_utf8(once).unwrap());
}
