// UI layer: an interactive menu using `dialoguer`. Each menu item plays the
// part of one page interaction (submitting a form, clicking a control) and
// hands it to the controller; the entry list is redrawn after every action.
// Failed calls are not reported on screen, only in the log.

use crate::api::CatalogApi;
use crate::controller::CatalogController;
use crate::model::{CupcakeForm, SearchForm};
use crate::view::{Entry, ListView};
use anyhow::Result;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::io::stdout;
use std::time::Duration;

/// Main interactive menu. Runs until the user chooses "Exit".
pub async fn main_menu<A: CatalogApi>(
    controller: &CatalogController<A, ListView>,
    csrf_token: String,
) -> Result<()> {
    let mut create_form = CupcakeForm::new(csrf_token.clone());
    let mut search_form = SearchForm::default();

    draw(controller)?;
    loop {
        let items = vec!["List", "Add", "Search", "Edit", "Delete", "Exit"];
        // `Select` shows a keyboard-navigable list in the terminal.
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => {
                let _ = with_spinner("Loading...", controller.load()).await?;
            }
            1 => handle_create(controller, &mut create_form).await?,
            2 => {
                search_form.term = Input::<String>::new()
                    .with_prompt("Search flavor")
                    .with_initial_text(search_form.term.clone())
                    .allow_empty(true)
                    .interact_text()?;
                let _ = with_spinner("Searching...", controller.submit_search(&search_form)).await?;
            }
            3 => handle_edit(controller, &csrf_token).await?,
            4 => handle_delete(controller).await?,
            5 => break,
            _ => {}
        }
        draw(controller)?;
    }
    Ok(())
}

/// Collect the create form's fields and submit it. Whatever is left in the
/// form afterwards is offered again next time.
async fn handle_create<A: CatalogApi>(
    controller: &CatalogController<A, ListView>,
    form: &mut CupcakeForm,
) -> Result<()> {
    prompt_fields(form)?;
    let _ = with_spinner("Adding...", controller.submit_create(form)).await?;
    Ok(())
}

/// Pick an entry, follow its update link, edit the pre-filled fields and
/// submit the update form.
async fn handle_edit<A: CatalogApi>(
    controller: &CatalogController<A, ListView>,
    csrf_token: &str,
) -> Result<()> {
    let Some(entry) = pick_entry(controller, "Edit which cupcake?")? else {
        return Ok(());
    };
    let loaded = with_spinner("Loading...", controller.follow_update_link(&entry, csrf_token)).await?;
    let Ok(mut form) = loaded else {
        return Ok(());
    };
    prompt_fields(&mut form.fields)?;
    let _ = with_spinner("Saving...", controller.submit_update(&form)).await?;
    Ok(())
}

async fn handle_delete<A: CatalogApi>(controller: &CatalogController<A, ListView>) -> Result<()> {
    let Some(entry) = pick_entry(controller, "Delete which cupcake?")? else {
        return Ok(());
    };
    let _ = with_spinner("Deleting...", controller.click_delete(&entry)).await?;
    Ok(())
}

/// Select one rendered entry. The returned entry is a copy so no view
/// borrow outlives the prompt.
fn pick_entry<A: CatalogApi>(
    controller: &CatalogController<A, ListView>,
    prompt: &str,
) -> Result<Option<Entry>> {
    let entries: Vec<Entry> = controller.view().entries().to_vec();
    if entries.is_empty() {
        println!("No cupcakes listed.");
        return Ok(None);
    }
    let labels: Vec<String> = entries
        .iter()
        .map(|e| format!("[{}] {}", e.id, e.label))
        .collect();
    let picked = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact_opt()?;
    Ok(picked.map(|idx| entries[idx].clone()))
}

fn prompt_fields(form: &mut CupcakeForm) -> Result<()> {
    form.flavor = text_field("Flavor", &form.flavor)?;
    form.size = text_field("Size", &form.size)?;
    form.rating = text_field("Rating", &form.rating)?;
    form.image = text_field("Image URL", &form.image)?;
    Ok(())
}

fn text_field(prompt: &str, current: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?;
    Ok(value)
}

/// Show a spinner while a request is pending.
async fn with_spinner<F: Future>(message: &'static str, request: F) -> Result<F::Output> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    let output = request.await;
    spinner.finish_and_clear();
    Ok(output)
}

/// Redraw the page: clear the terminal, then print every entry.
fn draw<A: CatalogApi>(controller: &CatalogController<A, ListView>) -> Result<()> {
    execute!(stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
    println!("Cupcakes\n");
    println!("{}\n", controller.view().render());
    Ok(())
}
