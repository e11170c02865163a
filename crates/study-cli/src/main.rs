//! study - personal study tracker
//!
//! Records subjects (matérias) with the PDFs found in their folder, tracks
//! completion and exports the list to csv, txt, md, json, xlsx and pdf.
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a default study.json
//! study config init
//!
//! # Add a subject and attach the PDFs in its folder
//! study add --name "Cálculo I" --folder ~/estudos/calculo --month março
//!
//! # List pending subjects from March to June
//! study list --pending --months março-junho
//!
//! # Export everything
//! study export -f csv -f pdf
//!
//! # Or just open the interactive menu
//! study
//! ```

mod app;
mod commands;
mod output;

fn main() {
    if let Err(err) = commands::run() {
        output::print_failure("Error: ", &err);
        std::process::exit(1);
    }
}
