// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    // Using a raw string literal for the multi-line banner
    let banner = r#"
 ____                            _      ____
|  _ \ _ __ ___  _ __ ___  _ __ | |_   / ___|_   _ _ __ ___
| |_) | '__/ _ \| '_ ` _ \| '_ \| __| | |  _| | | | '_ ` _ \
|  __/| | | (_) | | | | | | |_) | |_  | |_| | |_| | | | | | |
|_|   |_|  \___/|_| |_| |_| .__/ \__|  \____|\__, |_| |_| |_|
                          |_|                |___/

    Describe the picture. Get scored. Learn the words.
"#;
    println!("{}", banner);
}
