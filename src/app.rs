use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;

use crate::clients::MovieLookup;
use crate::config::{Config, API_KEY_VAR};
use crate::console::Console;
use crate::error::{CommandError, LookupError, ReportError};
use crate::model::movie::{format_rating_value, Rating};
use crate::persisters::MovieStorage;
use crate::search::{search, SearchOutcome};
use crate::stats::{compute_stats, sorted_by_rating};
use crate::website::generate_website;

const MENU: &str = "\nMenu:
0. Exit
1. List Movies
2. Add Movie
3. Delete Movie
4. Update Movie
5. Stats
6. Random movie
7. Search movie
8. Movies sorted by rating
9. Generate Website";

const EMPTY_COLLECTION: &str = "No movies found in your collection.";

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub template_path: PathBuf,
    pub output_path: PathBuf,
    pub page_title: String,
}

impl From<&Config> for AppSettings {
    fn from(config: &Config) -> Self {
        AppSettings {
            template_path: config.template_path.clone(),
            output_path: config.output_path.clone(),
            page_title: config.page_title.clone(),
        }
    }
}

pub struct MovieApp<S, L> {
    storage: S,
    lookup: L,
    settings: AppSettings,
    rng: StdRng,
}

impl<S: MovieStorage, L: MovieLookup> MovieApp<S, L> {
    pub fn new(storage: S, lookup: L, settings: AppSettings) -> Self {
        MovieApp {
            storage,
            lookup,
            settings,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Runs the menu until the user picks "0" or the input ends. Command
    /// failures are printed and the loop goes on; only console I/O errors
    /// are returned.
    pub async fn run<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> io::Result<()> {
        loop {
            console.say(MENU)?;
            let choice = match console.prompt_line("Enter your choice (0-9): ")? {
                Some(choice) => choice,
                None => return Ok(()),
            };

            let result = match choice.as_str() {
                "0" => {
                    console.say("Bye!")?;
                    return Ok(());
                }
                "1" => self.command_list_movies(console),
                "2" => self.command_add_movie(console).await,
                "3" => self.command_delete_movie(console),
                "4" => self.command_update_movie(console),
                "5" => self.command_movie_stats(console),
                "6" => self.command_random_movie(console),
                "7" => self.command_search_movie(console),
                "8" => self.command_movies_sorted_by_rating(console),
                "9" => self.command_generate_website(console),
                _ => console.say("Invalid choice").map_err(CommandError::from),
            };

            match result {
                Ok(()) => {}
                Err(CommandError::Console(e)) => return Err(e),
                Err(e) => {
                    log::error!("Command {} failed: {}", choice, e);
                    console.say(&format!("Error: {}", e))?;
                }
            }

            if console.prompt_line("\nPress Enter to continue")?.is_none() {
                return Ok(());
            }
        }
    }

    fn command_list_movies<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> Result<(), CommandError> {
        let movies = self.storage.list_movies();
        if movies.is_empty() {
            console.say(EMPTY_COLLECTION)?;
            return Ok(());
        }

        console.say(&format!("\n{} movies in total", movies.len()))?;
        for movie in &movies {
            console.say(&format!(
                "{} ({}), Rating: {}",
                movie.title, movie.year, movie.rating
            ))?;
        }
        Ok(())
    }

    async fn command_add_movie<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> Result<(), CommandError> {
        let query = console.prompt("Enter new movie name: ")?;
        let query = query.trim();
        if query.is_empty() {
            console.say("Movie name cannot be empty.")?;
            return Ok(());
        }

        let movie = match self.lookup.lookup(query).await {
            Ok(movie) => movie,
            Err(e) => {
                log::info!("Lookup for {:?} failed: {}", query, e);
                console.say(&lookup_failure_message(query, &e))?;
                return Ok(());
            }
        };

        let title = movie.title.clone();
        self.storage.add_movie(movie)?;
        console.say(&format!("Movie {} successfully added", title))?;
        Ok(())
    }

    fn command_delete_movie<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> Result<(), CommandError> {
        let title = console.prompt("Enter movie name to delete: ")?;
        let title = title.trim();
        if self.storage.delete_movie(title)? {
            console.say(&format!("Movie '{}' successfully deleted", title))?;
        } else {
            console.say(&format!("Movie {} doesn't exist!", title))?;
        }
        Ok(())
    }

    fn command_update_movie<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> Result<(), CommandError> {
        let title = console.prompt("Enter movie title to update: ")?;
        let title = title.trim();
        let new_rating = console.prompt("Enter new rating (0-10): ")?;
        let new_rating = new_rating.trim();

        if self.storage.update_movie(title, Rating::parse(new_rating))? {
            console.say(&format!(
                "Movie '{}' rating updated to {}.",
                title, new_rating
            ))?;
        } else {
            console.say(&format!("Error: Movie '{}' not found.", title))?;
        }
        Ok(())
    }

    fn command_movie_stats<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> Result<(), CommandError> {
        let movies = self.storage.list_movies();
        if movies.is_empty() {
            console.say(EMPTY_COLLECTION)?;
            return Ok(());
        }

        let stats = match compute_stats(&movies) {
            Some(stats) => stats,
            None => {
                console.say("No valid ratings found.")?;
                return Ok(());
            }
        };

        console.say("\nMovie Statistics:")?;
        console.say(&format!("Average rating: {:.2}", stats.average))?;
        console.say(&format!("Median rating: {:.2}", stats.median))?;
        console.say(&format!(
            "Best movie: {} ({})",
            stats.best.title,
            format_rating_value(stats.best.rating)
        ))?;
        console.say(&format!(
            "Worst movie: {} ({})",
            stats.worst.title,
            format_rating_value(stats.worst.rating)
        ))?;
        Ok(())
    }

    fn command_random_movie<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
    ) -> Result<(), CommandError> {
        let movies = self.storage.list_movies();
        match movies.iter().choose(&mut self.rng) {
            Some(movie) => console.say(&format!(
                "Your movie for tonight: {}, it's rated {}",
                movie.title, movie.rating
            ))?,
            None => console.say("No movies in the database.")?,
        }
        Ok(())
    }

    fn command_search_movie<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> Result<(), CommandError> {
        let query = console.prompt("Enter part of movie name: ")?;
        let movies = self.storage.list_movies();

        match search(&movies, &query) {
            SearchOutcome::Matches(found) => {
                for movie in found {
                    console.say(&format!("{}, {}", movie.title, movie.rating))?;
                }
            }
            SearchOutcome::Suggestions(similar) => {
                console.say("Did you mean:")?;
                for movie in similar {
                    console.say(&format!("- {}: {}", movie.title, movie.rating))?;
                }
            }
            SearchOutcome::NoMatch => console.say("No similar movies found.")?,
        }
        Ok(())
    }

    fn command_movies_sorted_by_rating<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> Result<(), CommandError> {
        let movies = self.storage.list_movies();
        if movies.is_empty() {
            console.say(EMPTY_COLLECTION)?;
            return Ok(());
        }

        console.say("\nMovies sorted by rating:")?;
        for movie in sorted_by_rating(&movies) {
            console.say(&format!("{}: {}", movie.title, movie.rating))?;
        }
        Ok(())
    }

    fn command_generate_website<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> Result<(), CommandError> {
        let movies = self.storage.list_movies();
        let result = generate_website(
            &movies,
            &self.settings.template_path,
            &self.settings.output_path,
            &self.settings.page_title,
        );

        match result {
            Ok(()) => console.say("Website was generated successfully.")?,
            Err(ReportError::TemplateNotFound(path)) => console.say(&format!(
                "Error: Template file not found at {}.",
                path.display()
            ))?,
            Err(e) => {
                log::error!("Website generation failed: {}", e);
                console.say(&format!("Error generating website: {}", e))?
            }
        }
        Ok(())
    }
}

fn lookup_failure_message(query: &str, error: &LookupError) -> String {
    match error {
        LookupError::NotFound(_) => format!("Didn't find movie {} in the API.", query),
        LookupError::Status(code) => format!(
            "Error: Failed to fetch data. Server responded with status code {}",
            code
        ),
        LookupError::Transport(e) => format!(
            "Error: Failed to connect to the OMDb API. \
             Please check your internet connection or try again later.\nDetails: {}",
            e
        ),
        LookupError::MissingApiKey => format!(
            "Error: {} is not set, movies cannot be looked up.",
            API_KEY_VAR
        ),
        LookupError::Malformed(details) => {
            format!("Error: Unexpected response from the OMDb API: {}", details)
        }
    }
}
