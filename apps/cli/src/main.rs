mod render;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    filters::{matches_search, should_refetch, AddressFilterPatch, CustomerFilter, ListDeps},
    load_settings,
    settings::normalize_base_url,
    state::EntityState,
    validation::{validate_address, validate_customer, FieldErrors},
    AddressController, AppContext, CustomerController,
};
use shared::domain::{Address, AddressDraft, AddressId, Customer, CustomerDraft, CustomerId, Entity};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "customer-cli", about = "Manage customers and their addresses")]
struct Cli {
    /// Settings file; `client.toml` in the working directory is used when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Overrides the configured service base URL.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(subcommand)]
    Customers(CustomerCommand),
    #[command(subcommand)]
    Addresses(AddressCommand),
}

#[derive(Subcommand, Debug)]
enum CustomerCommand {
    /// Lists customers, narrowed to those with a matching address when any filter is given.
    List {
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        pin_code: Option<String>,
        /// Keeps customers whose name, email, phone or id contains this text.
        #[arg(long)]
        search: Option<String>,
    },
    Show {
        id: i64,
    },
    Create(CustomerFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: CustomerFields,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum AddressCommand {
    List {
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        pin_code: Option<String>,
        #[arg(long)]
        customer_id: Option<i64>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        /// Keep fetching until the last page.
        #[arg(long)]
        all: bool,
    },
    Show {
        id: i64,
    },
    Create(AddressFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: AddressFields,
    },
    Delete {
        id: i64,
    },
}

#[derive(Args, Debug)]
struct CustomerFields {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    email: Option<String>,
}

impl CustomerFields {
    fn apply(self, draft: &mut CustomerDraft) {
        if let Some(v) = self.first_name {
            draft.first_name = v;
        }
        if let Some(v) = self.last_name {
            draft.last_name = v;
        }
        if let Some(v) = self.phone {
            draft.phone = v;
        }
        if let Some(v) = self.email {
            draft.email = non_empty(v);
        }
    }
}

#[derive(Args, Debug)]
struct AddressFields {
    #[arg(long)]
    customer_id: Option<i64>,
    #[arg(long)]
    address_line1: Option<String>,
    #[arg(long)]
    address_line2: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    pin_code: Option<String>,
    #[arg(long)]
    primary: Option<bool>,
}

impl AddressFields {
    fn apply(self, draft: &mut AddressDraft) {
        if let Some(v) = self.customer_id {
            draft.customer_id = Some(CustomerId(v));
        }
        if let Some(v) = self.address_line1 {
            draft.address_line1 = v;
        }
        if let Some(v) = self.address_line2 {
            draft.address_line2 = non_empty(v);
        }
        if let Some(v) = self.city {
            draft.city = v;
        }
        if let Some(v) = self.state {
            draft.state = v;
        }
        if let Some(v) = self.pin_code {
            draft.pin_code = v;
        }
        if let Some(v) = self.primary {
            draft.is_primary = v;
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(api_url) = &cli.api_url {
        settings.api_base_url = normalize_base_url(api_url)?;
    }
    info!(api_base_url = %settings.api_base_url, "using customer service");

    let context = AppContext::connect(&settings)?;
    match cli.command {
        Command::Customers(command) => run_customers(context.customers()?, command).await,
        Command::Addresses(command) => run_addresses(context.addresses()?, command).await,
    }
}

async fn run_customers(customers: &CustomerController, command: CustomerCommand) -> Result<()> {
    match command {
        CustomerCommand::List {
            city,
            state,
            pin_code,
            search,
        } => {
            let filter = CustomerFilter {
                city: city.unwrap_or_default(),
                state: state.unwrap_or_default(),
                pin_code: pin_code.unwrap_or_default(),
            };
            if filter == CustomerFilter::default() {
                customers.fetch_list().await;
            } else {
                customers.fetch_filtered(&filter).await;
            }
            let state = customers.state();
            settled(&state.entities)?;
            let term = search.unwrap_or_default();
            let matching: Vec<Customer> = state
                .entities
                .collection
                .into_iter()
                .filter(|customer| matches_search(customer, &term))
                .collect();
            render::customers(&matching);
        }
        CustomerCommand::Show { id } => {
            let customer = load_customer(customers, CustomerId(id)).await?;
            render::customer_detail(&customer);
        }
        CustomerCommand::Create(fields) => {
            let mut draft = CustomerDraft::default();
            fields.apply(&mut draft);
            check(validate_customer(&draft))?;

            let created = customers.create(&draft).await?;
            render::success(&customers.state().entities);
            render::customer_detail(&created);
        }
        CustomerCommand::Update { id, fields } => {
            let current = load_customer(customers, CustomerId(id)).await?;
            let mut draft = CustomerDraft::from(&current);
            fields.apply(&mut draft);
            check(validate_customer(&draft))?;

            let updated = customers.update(current.id, &draft).await?;
            render::success(&customers.state().entities);
            render::customer_detail(&updated);
        }
        CustomerCommand::Delete { id } => {
            customers.delete(CustomerId(id)).await?;
            render::success(&customers.state().entities);
        }
    }
    Ok(())
}

async fn run_addresses(addresses: &AddressController, command: AddressCommand) -> Result<()> {
    match command {
        AddressCommand::List {
            city,
            state,
            pin_code,
            customer_id,
            page,
            limit,
            all,
        } => {
            let mut patch = AddressFilterPatch::new();
            if let Some(city) = city {
                patch = patch.city(city);
            }
            if let Some(state) = state {
                patch = patch.state(state);
            }
            if let Some(pin_code) = pin_code {
                patch = patch.pin_code(pin_code);
            }
            if let Some(customer_id) = customer_id {
                patch = patch.customer(CustomerId(customer_id));
            }
            addresses.set_filters(patch);
            if let Some(page) = page {
                addresses.set_page(page);
            }
            list_addresses(addresses, limit, all).await?;
        }
        AddressCommand::Show { id } => {
            let address = load_address(addresses, AddressId(id)).await?;
            render::address_detail(&address);
        }
        AddressCommand::Create(fields) => {
            let mut draft = AddressDraft::default();
            fields.apply(&mut draft);
            check(validate_address(&draft))?;

            let created = addresses.create(&draft).await?;
            println!("created address {}", created.id);
            render::address_detail(&created);
        }
        AddressCommand::Update { id, fields } => {
            let current = load_address(addresses, AddressId(id)).await?;
            let mut draft = AddressDraft::from(&current);
            fields.apply(&mut draft);
            check(validate_address(&draft))?;

            let updated = addresses.update(current.id, &draft).await?;
            println!("updated address {}", updated.id);
            render::address_detail(&updated);
        }
        AddressCommand::Delete { id } => {
            addresses.delete(AddressId(id)).await?;
            println!("deleted address {id}");
        }
    }
    Ok(())
}

/// Fetches whenever the list inputs moved since the last fetch; with `all`, walks forward
/// page by page.
async fn list_addresses(addresses: &AddressController, limit: Option<u32>, all: bool) -> Result<()> {
    let mut fetched: Option<ListDeps> = None;
    loop {
        let deps = addresses.list_deps();
        if fetched.as_ref().map_or(true, |prev| should_refetch(prev, &deps)) {
            match limit {
                Some(limit) => addresses.fetch_list_page(deps.page, limit).await,
                None => addresses.fetch_list().await,
            }
            fetched = Some(addresses.list_deps());
        } else {
            debug!(page = deps.page, "list inputs unchanged");
        }

        let state = addresses.state();
        settled(&state.entities)?;
        render::address_page(&state);
        if !all || !state.pagination.has_next() {
            return Ok(());
        }
        addresses.set_page(state.pagination.page + 1);
    }
}

async fn load_customer(customers: &CustomerController, id: CustomerId) -> Result<Customer> {
    customers.fetch_one(id).await;
    let state = customers.state();
    settled(&state.entities)?;
    state
        .entities
        .focus
        .filter(|customer| customer.id == id)
        .with_context(|| format!("customer {id} was not loaded"))
}

async fn load_address(addresses: &AddressController, id: AddressId) -> Result<Address> {
    addresses.fetch_one(id).await;
    let state = addresses.state();
    settled(&state.entities)?;
    state
        .entities
        .focus
        .filter(|address| address.id == id)
        .with_context(|| format!("address {id} was not loaded"))
}

/// Read operations only report failures through the store.
fn settled<E: Entity>(entities: &EntityState<E>) -> Result<()> {
    match &entities.last_error {
        Some(error) => bail!("{error}"),
        None => Ok(()),
    }
}

fn check(errors: FieldErrors) -> Result<()> {
    if errors.is_empty() {
        return Ok(());
    }
    for (field, message) in errors.iter() {
        eprintln!("  {field}: {message}");
    }
    bail!("{} field(s) need attention", errors.len())
}
