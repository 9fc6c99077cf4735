use ahcharts::run_app;
use std::path::Path;

fn arguments(args: &[&str], data_folder: &Path) -> Vec<String> {
    let mut function_args: Vec<String> = vec!["testing".to_string()];
    for arg in args {
        function_args.push(arg.to_string());
    }
    function_args.push("--args-only".to_string());
    function_args.push("--data-folder".to_string());
    function_args.push(data_folder.to_string_lossy().to_string());
    function_args
}

#[allow(dead_code)]
pub fn test_args(args: &[&str], data_folder: &Path) {
    let res = run_app(arguments(args, data_folder));
    assert!(res.is_ok(), "{:?} failed: {}", args, res.unwrap_err());
}

#[allow(dead_code)]
pub fn test_err(args: &[&str], data_folder: &Path) {
    let res = run_app(arguments(args, data_folder));
    assert!(res.is_err());
}
