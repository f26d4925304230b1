use osshell::Interpreter;

fn main() -> anyhow::Result<()> {
    println!("Welcome to OSShell! Please enter your commands ('exit' to quit).");
    Interpreter::default().repl()
}
