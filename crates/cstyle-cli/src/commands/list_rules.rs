//! List rules command implementation.

use cstyle_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<8} {:<22} {:<9} Description", "Code", "Name", "Severity");
    println!("{}", "-".repeat(96));

    for rule in all_rules() {
        println!(
            "{:<8} {:<22} {:<9} {}",
            rule.code(),
            rule.name(),
            rule.default_severity().to_string(),
            rule.description()
        );
    }

    println!("\nPresets:");
    println!("  recommended  - all rules except CS004 and CS010 (default)");
    println!("  strict       - all rules");
    println!("  minimal      - CS001, CS005, CS006 (for gradual adoption)");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  cstyle check --rules line-length,operator-spacing");
    println!("  cstyle check --rules CS001,CS002,CS012");
}
