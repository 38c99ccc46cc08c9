mod home;
pub use home::Home;

mod scanner;
pub use scanner::Scanner;
