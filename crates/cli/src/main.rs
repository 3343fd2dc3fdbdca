//! Vitrina CLI - storefront and admin console operations from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (token is stored in VITRINA_STATE_PATH)
//! vitrina auth login -e ana@example.com -p secret
//!
//! # Browse the catalog
//! vitrina catalog
//! vitrina products list --category c1
//!
//! # Fill the cart and check out
//! vitrina cart add p1 --quantity 2
//! vitrina cart checkout
//!
//! # Admin: move a sale forward
//! vitrina sales status 42 realizada
//! ```
//!
//! # Commands
//!
//! - `auth` - Sign in, register, sign out, inspect the session
//! - `users` - List accounts
//! - `products`, `categories` - Catalog management
//! - `catalog` - Categories with their products
//! - `sales` - Sale listing, search, and status workflow
//! - `cart` - Local cart and checkout
//! - `landing` - Landing page content

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vitrina_client::{ApiClient, ClientConfig};
use vitrina_core::{
    CategoryInput, LandingSectionPatch, ProductInput, SaleStatus, SectionKind,
};

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "vitrina")]
#[command(author, version, about = "Vitrina storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and session state
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Manage accounts
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
    /// Manage products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: CategoriesAction,
    },
    /// Show categories with their products
    Catalog,
    /// Manage sales
    Sales {
        #[command(subcommand)]
        action: SalesAction,
    },
    /// Manage the local cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage landing page content
    Landing {
        #[command(subcommand)]
        action: LandingAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        #[arg(short, long)]
        name: String,
    },
    /// Forget the stored token
    Logout,
    /// Show the signed-in account
    Me,
    /// Show local session state
    Status,
}

#[derive(Subcommand)]
enum UsersAction {
    /// List all accounts
    List,
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products
    List {
        /// Only products in this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show one product
    Get { id: String },
    /// Create a product
    Create(ProductArgs),
    /// Update a product
    Update {
        id: String,
        #[command(flatten)]
        fields: ProductArgs,
    },
    /// Delete a product
    Delete { id: String },
}

#[derive(Args)]
struct ProductArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Unit price, e.g. 9.99
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    image: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    stock: Option<u32>,
}

impl ProductArgs {
    fn into_input(self) -> Result<ProductInput, CommandError> {
        Ok(ProductInput {
            name: self.name,
            description: self.description,
            price: self
                .price
                .as_deref()
                .map(commands::catalog::parse_price)
                .transpose()?,
            image: self.image,
            category_id: self.category.map(Into::into),
            stock: self.stock,
        })
    }
}

#[derive(Subcommand)]
enum CategoriesAction {
    /// List categories
    List,
    /// Show one category
    Get { id: String },
    /// Create a category
    Create(CategoryArgs),
    /// Update a category
    Update {
        id: String,
        #[command(flatten)]
        fields: CategoryArgs,
    },
    /// Delete a category
    Delete { id: String },
}

#[derive(Args)]
struct CategoryArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    image: Option<String>,
}

impl From<CategoryArgs> for CategoryInput {
    fn from(args: CategoryArgs) -> Self {
        Self {
            name: args.name,
            description: args.description,
            image: args.image,
        }
    }
}

#[derive(Subcommand)]
enum SalesAction {
    /// List sales
    List {
        /// Only sales placed by this user
        #[arg(short, long)]
        user: Option<String>,
        /// Match buyer name or email, sale id, status, or total
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one sale
    Get { id: String },
    /// Change a sale's status (admin)
    Status {
        id: String,
        /// `pendiente`, `planificada`, `realizada`, or `cancelada`
        status: SaleStatus,
    },
    /// Cancel one of your pending sales
    Cancel { id: String },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add a product
    Add {
        product_id: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity (0 removes it)
    Set { product_id: String, quantity: u32 },
    /// Remove a line
    Remove { product_id: String },
    /// Empty the cart
    Clear,
    /// Place a sale for the cart contents
    Checkout,
}

#[derive(Subcommand)]
enum LandingAction {
    /// Show the landing page
    Show {
        /// Only visible sections, in display order
        #[arg(long)]
        visible_only: bool,
    },
    /// Update page-level fields
    Update {
        #[arg(long)]
        company_name: Option<String>,
        #[arg(long)]
        company_description: Option<String>,
        #[arg(long)]
        logo: Option<String>,
    },
    /// Append a section
    AddSection {
        /// `hero`, `about`, `features`, `testimonials`, or `contact`
        kind: SectionKind,
        #[command(flatten)]
        fields: SectionArgs,
    },
    /// Edit a section
    EditSection {
        id: String,
        #[command(flatten)]
        fields: SectionArgs,
    },
    /// Delete a section
    DeleteSection { id: String },
}

#[derive(Args)]
struct SectionArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    content: Option<String>,
    #[arg(long)]
    image: Option<String>,
    #[arg(long)]
    order: Option<i64>,
    #[arg(long)]
    visible: Option<bool>,
}

impl From<SectionArgs> for LandingSectionPatch {
    fn from(args: SectionArgs) -> Self {
        Self {
            kind: None,
            title: args.title,
            content: args.content,
            image: args.image,
            order: args.order,
            visible: args.visible,
        }
    }
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = ClientConfig::from_env();

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vitrina_client=info,vitrina_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli, &config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ClientConfig) -> Result<(), CommandError> {
    use commands::{auth, cart, catalog, landing, sales, users};

    let api = ApiClient::from_config(config)?;
    tracing::debug!(api_url = %api.api_url(), "Client ready");

    match cli.command {
        Commands::Auth { action } => match action {
            AuthAction::Login { email, password } => auth::login(&api, &email, password).await,
            AuthAction::Register {
                email,
                password,
                name,
            } => auth::register(&api, email, password, name).await,
            AuthAction::Logout => auth::logout(&api),
            AuthAction::Me => auth::me(&api).await,
            AuthAction::Status => auth::status(&api),
        },
        Commands::Users { action } => match action {
            UsersAction::List => users::list(&api).await,
        },
        Commands::Products { action } => match action {
            ProductsAction::List { category } => catalog::list_products(&api, category).await,
            ProductsAction::Get { id } => catalog::get_product(&api, id).await,
            ProductsAction::Create(fields) => {
                catalog::create_product(&api, fields.into_input()?).await
            }
            ProductsAction::Update { id, fields } => {
                catalog::update_product(&api, id, fields.into_input()?).await
            }
            ProductsAction::Delete { id } => catalog::delete_product(&api, id).await,
        },
        Commands::Categories { action } => match action {
            CategoriesAction::List => catalog::list_categories(&api).await,
            CategoriesAction::Get { id } => catalog::get_category(&api, id).await,
            CategoriesAction::Create(fields) => catalog::create_category(&api, fields.into()).await,
            CategoriesAction::Update { id, fields } => {
                catalog::update_category(&api, id, fields.into()).await
            }
            CategoriesAction::Delete { id } => catalog::delete_category(&api, id).await,
        },
        Commands::Catalog => catalog::browse(&api).await,
        Commands::Sales { action } => match action {
            SalesAction::List { user, search } => sales::list(&api, user, search).await,
            SalesAction::Get { id } => sales::get(&api, id).await,
            SalesAction::Status { id, status } => sales::set_status(&api, id, status).await,
            SalesAction::Cancel { id } => sales::cancel(&api, id).await,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => cart::show(&api),
            CartAction::Add {
                product_id,
                quantity,
            } => cart::add(&api, product_id, quantity).await,
            CartAction::Set {
                product_id,
                quantity,
            } => cart::set(&api, product_id, quantity),
            CartAction::Remove { product_id } => cart::remove(&api, product_id),
            CartAction::Clear => cart::clear(&api),
            CartAction::Checkout => cart::checkout(&api).await,
        },
        Commands::Landing { action } => match action {
            LandingAction::Show { visible_only } => landing::show(&api, visible_only).await,
            LandingAction::Update {
                company_name,
                company_description,
                logo,
            } => {
                let changes = landing::PageChanges {
                    company_name,
                    company_description,
                    logo,
                };
                landing::update_page(&api, changes).await
            }
            LandingAction::AddSection { kind, fields } => {
                landing::add_section(&api, kind, fields.into()).await
            }
            LandingAction::EditSection { id, fields } => {
                landing::edit_section(&api, id, fields.into()).await
            }
            LandingAction::DeleteSection { id } => landing::delete_section(&api, id).await,
        },
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
