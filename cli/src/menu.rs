use std::io::{self, BufRead, Write};
use std::path::Path;

use city_graph_core::{
    by_name, describe, in_region, k_nearest, path_to, DistanceMode, LocationDetails,
};

use crate::state::Session;
use crate::util::{parse_below, whole_miles};

const MENU: &str = "\
== MAIN MENU ==
1 - Load city data from file
2 - Display all cities in a state
3 - Display info about a city
4 - Set the current city by providing an ID number
5 - Display info about the current city
6 - Find n closest cities using GPS distances
7 - Find n closest cities using edge weights
8 - Print the shortest path from the current city to a destination
9 - Quit";

/// Interactive text menu over a `Session`.
///
/// Every action reports problems on the output and returns to the menu;
/// only I/O failures on the terminal itself end the loop early.
pub struct Menu<'s, R, W> {
    session: &'s mut Session,
    input: R,
    output: W,
}

impl<'s, R: BufRead, W: Write> Menu<'s, R, W> {
    pub fn new(session: &'s mut Session, input: R, output: W) -> Self {
        Self {
            session,
            input,
            output,
        }
    }

    /// Run until the user quits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "\n{}", MENU)?;
            let Some(choice) = self.read_line()? else {
                break;
            };

            match choice.trim() {
                "1" => self.load()?,
                "2" => self.list_region()?,
                "3" => self.show_city()?,
                "4" => self.set_current()?,
                "5" => self.show_current()?,
                "6" => self.nearest(DistanceMode::GreatCircle)?,
                "7" => self.nearest(DistanceMode::EdgeWeight)?,
                "8" => self.path()?,
                "9" => {
                    writeln!(self.output, "~Goodbye~")?;
                    break;
                }
                _ => writeln!(self.output, "Invalid input. Please try again.")?,
            }
        }
        Ok(())
    }

    /// Load a file at startup, reporting the outcome like menu item 1.
    pub fn load_path(&mut self, path: &Path) -> io::Result<()> {
        match self.session.load_file(path) {
            Ok(summary) => writeln!(
                self.output,
                "Data from {} successfully loaded ({} new cities, {} total, {} connections, \
                 road network #{}).",
                path.display(),
                summary.added,
                summary.total,
                summary.edges,
                self.session.generation()
            ),
            Err(e) => writeln!(self.output, "Could not load {}: {}", path.display(), e),
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        writeln!(self.output, "{}", text)?;
        self.read_line()
    }

    /// Prompt for a number in `[0, count)`; `None` after reporting a bad answer.
    fn prompt_below(&mut self, text: &str) -> io::Result<Option<usize>> {
        let count = self.session.store().count();
        let hint = format!(
            "[Choose a number between 0 and {} (the number of cities currently stored)]",
            count.saturating_sub(1)
        );
        let Some(answer) = self.prompt(&format!("{}\n{}", text, hint))? else {
            return Ok(None);
        };
        match parse_below(&answer, count) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                writeln!(self.output, "Invalid entry: {}. Returning to main menu.", e)?;
                Ok(None)
            }
        }
    }

    fn load(&mut self) -> io::Result<()> {
        if !self.session.sources().is_empty() {
            let answer = self.prompt(
                "There is already city data stored. Type \"Y\" to clear it before loading \
                 new data, or anything else to keep it.",
            )?;
            if answer.is_some_and(|a| a.trim().eq_ignore_ascii_case("y")) {
                self.session.reset();
            }
        }

        let Some(filename) = self.prompt("Please enter a filename:")? else {
            return Ok(());
        };
        self.load_path(Path::new(filename.trim()))
    }

    fn list_region(&mut self) -> io::Result<()> {
        let Some(region) = self.prompt("Please enter the name of the state you would like to search:")?
        else {
            return Ok(());
        };
        let region = region.trim();
        writeln!(self.output, "Displaying all cities in {}:", region)?;

        let matches = in_region(self.session.store(), self.session.graph(), region);
        if matches.is_empty() {
            writeln!(self.output, "No cities found.")?;
        }
        for d in matches {
            writeln!(
                self.output,
                "#{}: {} [Incount: {} || Outcount: {}]",
                d.location.id, d.location.name, d.degree.in_degree, d.degree.out_degree
            )?;
        }
        Ok(())
    }

    fn show_city(&mut self) -> io::Result<()> {
        let Some(name) = self.prompt("Please enter the name of the city you would like to search:")?
        else {
            return Ok(());
        };
        let store = self.session.store();
        match by_name(store, self.session.graph(), name.trim()) {
            Some(details) => write_details(&mut self.output, &details),
            None => writeln!(self.output, "Invalid city. Returning to main menu."),
        }
    }

    fn set_current(&mut self) -> io::Result<()> {
        let Some(id) = self.prompt_below("Please enter a city ID to assign as the current city.")?
        else {
            return Ok(());
        };
        match self.session.set_current(id) {
            Ok(()) => writeln!(self.output, "Current city set to {}.", id),
            Err(e) => writeln!(self.output, "{}", e),
        }
    }

    fn show_current(&mut self) -> io::Result<()> {
        let selection = match self.session.current() {
            Ok(s) => s,
            Err(e) => return writeln!(self.output, "{}. Load a file first.", e),
        };
        if selection.randomly_chosen {
            writeln!(self.output, "[randomly determined]")?;
        }
        match describe(self.session.store(), self.session.graph(), selection.id) {
            Ok(details) => write_details(&mut self.output, &details),
            Err(e) => writeln!(self.output, "{}", e),
        }
    }

    fn nearest(&mut self, mode: DistanceMode) -> io::Result<()> {
        let Some(k) = self.prompt_below(
            "Please enter a positive integer for how many of the nearest cities to locate.",
        )?
        else {
            return Ok(());
        };
        let selection = match self.session.current() {
            Ok(s) => s,
            Err(e) => return writeln!(self.output, "{}. Load a file first.", e),
        };

        let store = self.session.store();
        let source = match store.get(selection.id) {
            Ok(l) => l,
            Err(e) => return writeln!(self.output, "{}", e),
        };
        writeln!(
            self.output,
            "Current city: #{} ({}, {})",
            source.id, source.name, source.region
        )?;

        match k_nearest(store, self.session.graph(), selection.id, k, mode) {
            Ok(ranked) => {
                for (i, n) in ranked.iter().enumerate() {
                    writeln!(
                        self.output,
                        "Closest city #{}: {}, {} (distance: {})",
                        i + 1,
                        n.location.name,
                        n.location.region,
                        whole_miles(n.distance)
                    )?;
                }
                if ranked.len() < k {
                    writeln!(
                        self.output,
                        "Only {} other cities are reachable from here.",
                        ranked.len()
                    )?;
                }
                Ok(())
            }
            Err(e) => writeln!(self.output, "{}", e),
        }
    }

    fn path(&mut self) -> io::Result<()> {
        let Some(target) = self.prompt_below("Please enter the ID number for the destination city.")?
        else {
            return Ok(());
        };
        let selection = match self.session.current() {
            Ok(s) => s,
            Err(e) => return writeln!(self.output, "{}. Load a file first.", e),
        };

        match path_to(self.session.store(), self.session.graph(), selection.id, target) {
            Ok(steps) => {
                writeln!(self.output, "\nStart city:")?;
                for (i, step) in steps.iter().enumerate() {
                    if i > 0 {
                        writeln!(self.output, "...to...")?;
                    }
                    writeln!(
                        self.output,
                        "{}, {} [distance so far: {}]",
                        step.location.name,
                        step.location.region,
                        whole_miles(step.distance)
                    )?;
                }
                Ok(())
            }
            Err(e) => writeln!(self.output, "{}", e),
        }
    }
}

fn write_details<W: Write>(out: &mut W, d: &LocationDetails<'_>) -> io::Result<()> {
    let l = d.location;
    writeln!(out, "City: {}", l.name)?;
    writeln!(out, "State: {}", l.region)?;
    writeln!(out, "ID: {}", l.id)?;
    writeln!(out, "Longitude / latitude: {}, {}", l.longitude, l.latitude)?;
    writeln!(out, "Incoming connections: {}", d.degree.in_degree)?;
    writeln!(out, "Outgoing connections: {}", d.degree.out_degree)
}
