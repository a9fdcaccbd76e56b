//! `mercato` command line

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use mercato_client::{BackendClient, ClientConfig};
use rust_decimal::Decimal;
use shared::error::AppError;
use shared::models::{ExperimentAssignment, GeoPoint, PromoRedemption, ServiceType};
use std::io::{BufRead, Write};
use tracing::{info, warn};

use mercato_core::cart::{AddOutcome, CartStore, catalog};
use mercato_core::checkout::{CartTerms, CheckoutRequest, build_order};
use mercato_core::money::format_money;
use mercato_core::promo::{PromoContext, PromoVerdict, validate_promo};
use mercato_core::{Config, chatbot, experiments, geo, open_cart_store, orders};

#[derive(Debug, Parser)]
#[command(name = "mercato", version, about = "Mercato marketplace client")]
pub struct Cli {
    /// Print JSON instead of text where supported
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect and edit the cart
    #[command(subcommand)]
    Cart(CartCommand),

    /// Browse listings
    Restaurants(RestaurantsArgs),

    /// Show a restaurant's available menu
    Menu { restaurant_id: String },

    /// Order history and spend summary
    Orders,

    /// Promo codes
    #[command(subcommand)]
    Promo(PromoCommand),

    /// Ask the support assistant
    Chat {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Show the variant of an experiment for the current user
    Variant { experiment_id: String },
}

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// List items and totals
    Show,

    /// Add one unit of a menu item
    Add {
        menu_item_id: String,
        /// Empty the cart if the item is from another restaurant
        #[arg(long, conflicts_with = "keep")]
        replace: bool,
        /// Keep the current cart if the item is from another restaurant
        #[arg(long)]
        keep: bool,
    },

    /// Remove an item
    Remove { menu_item_id: String },

    /// Set an item's quantity (0 or less removes it)
    SetQty {
        menu_item_id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i32,
    },

    /// Set or clear an item's preparation instructions
    Note {
        menu_item_id: String,
        text: Option<String>,
    },

    /// Empty the cart
    Clear,

    /// Place the order
    Checkout {
        #[arg(long)]
        promo: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct RestaurantsArgs {
    /// food, hotel, venue or ride
    #[arg(long)]
    pub service: Option<ServiceType>,

    /// Name contains
    #[arg(long)]
    pub search: Option<String>,

    /// Sort by distance from "lat,lon"
    #[arg(long, value_parser = parse_point)]
    pub near: Option<GeoPoint>,
}

#[derive(Debug, Subcommand)]
pub enum PromoCommand {
    /// Validate a code against the current cart
    Check { code: String },
}

fn parse_point(value: &str) -> Result<GeoPoint, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| "expected \"lat,lon\"".to_string())?;
    let point = GeoPoint::new(
        lat.trim().parse().map_err(|_| format!("invalid latitude '{}'", lat))?,
        lon.trim().parse().map_err(|_| format!("invalid longitude '{}'", lon))?,
    );
    if !point.is_valid() {
        return Err(format!("coordinates out of range: {}", value));
    }
    Ok(point)
}

struct App {
    config: Config,
    backend: BackendClient,
    json: bool,
}

pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let mut client_config = ClientConfig::new(&config.backend_url, &config.api_key)
        .with_timeout(config.request_timeout);
    if let Some(token) = &config.access_token {
        client_config = client_config.with_access_token(token);
    }
    let backend = client_config.build().context("failed to build backend client")?;

    let app = App {
        config,
        backend,
        json: cli.json,
    };

    match cli.command {
        Command::Cart(cmd) => app.cart(cmd).await,
        Command::Restaurants(args) => app.restaurants(args).await,
        Command::Menu { restaurant_id } => app.menu(&restaurant_id).await,
        Command::Orders => app.orders().await,
        Command::Promo(PromoCommand::Check { code }) => app.promo_check(&code).await,
        Command::Chat { message } => app.chat(&message.join(" ")),
        Command::Variant { experiment_id } => app.variant(&experiment_id).await,
    }
}

impl App {
    fn user_id(&self) -> Option<&str> {
        self.config.user_id.as_deref()
    }

    fn print_json<T: serde::Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    // ========== Cart ==========

    async fn cart(&self, cmd: CartCommand) -> Result<()> {
        let mut store = open_cart_store(&self.config)?;

        match cmd {
            CartCommand::Show => {}
            CartCommand::Add {
                menu_item_id,
                replace,
                keep,
            } => self.cart_add(&mut store, &menu_item_id, replace, keep).await?,
            CartCommand::Remove { menu_item_id } => {
                if !store.remove_item(&menu_item_id) {
                    return Err(AppError::cart_item_not_found(menu_item_id).into());
                }
            }
            CartCommand::SetQty {
                menu_item_id,
                quantity,
            } => {
                if !store.update_quantity(&menu_item_id, quantity) {
                    return Err(AppError::cart_item_not_found(menu_item_id).into());
                }
            }
            CartCommand::Note { menu_item_id, text } => {
                if !store.update_instructions(&menu_item_id, text) {
                    return Err(AppError::cart_item_not_found(menu_item_id).into());
                }
            }
            CartCommand::Clear => store.clear_cart(),
            CartCommand::Checkout { promo, address } => {
                return self.checkout(&mut store, promo.as_deref(), address).await;
            }
        }

        self.print_cart(&store)
    }

    async fn cart_add(&self, store: &mut CartStore, menu_item_id: &str, replace: bool, keep: bool) -> Result<()> {
        let item = catalog::orderable_item(
            menu_item_id,
            self.backend.get_menu_item(menu_item_id).await?,
        )?;
        let restaurant = catalog::owning_restaurant(
            &item.restaurant_id,
            self.backend.get_restaurant(&item.restaurant_id).await?,
        )?;

        match store.add_item(item.to_cart_input(&restaurant.name)) {
            AddOutcome::Added | AddOutcome::Incremented => {}
            AddOutcome::Conflict => {
                let current = store.state().restaurant_name.clone().unwrap_or_default();
                let switch = if replace {
                    true
                } else if keep {
                    false
                } else {
                    confirm(&format!(
                        "Your cart has items from {}. Start a new cart from {}?",
                        current, restaurant.name
                    ))?
                };

                if switch {
                    store.confirm_restaurant_change();
                    info!(restaurant = %restaurant.name, "Cart switched restaurant");
                } else {
                    store.cancel_restaurant_change();
                    println!("Kept your cart from {}.", current);
                }
            }
        }
        Ok(())
    }

    fn print_cart(&self, store: &CartStore) -> Result<()> {
        let totals = store.totals(self.config.delivery_fee);
        if self.json {
            return self.print_json(&serde_json::json!({
                "restaurant_id": store.state().restaurant_id,
                "restaurant_name": store.state().restaurant_name,
                "items": store.items(),
                "totals": totals,
            }));
        }

        let Some(restaurant) = &store.state().restaurant_name else {
            println!("Your cart is empty.");
            return Ok(());
        };

        println!("Cart from {}", restaurant);
        for item in store.items() {
            println!(
                "  {:>3} x {:<30} {:>10}  [{}]",
                item.quantity,
                item.name,
                format_money(item.line_total()),
                item.menu_item_id
            );
            if let Some(note) = &item.special_instructions {
                println!("        note: {}", note);
            }
        }
        println!("  {:<36} {:>10}", "Subtotal", format_money(totals.subtotal));
        println!("  {:<36} {:>10}", "Service fee", format_money(totals.service_fee));
        println!("  {:<36} {:>10}", "Tax", format_money(totals.tax));
        println!("  {:<36} {:>10}", "Delivery", format_money(totals.delivery_fee));
        println!("  {:<36} {:>10}", "Total", format_money(totals.total));
        Ok(())
    }

    async fn checkout(&self, store: &mut CartStore, promo: Option<&str>, address: Option<String>) -> Result<()> {
        let user_id = self
            .user_id()
            .context("set MERCATO_USER_ID and MERCATO_ACCESS_TOKEN to place orders")?;
        if store.state().restaurant_id.is_none() {
            return Err(AppError::cart_empty().into());
        }
        let CartTerms {
            service_type,
            delivery_fee,
        } = self.cart_terms(store).await?;

        let (verdict, promo_id) = match promo {
            Some(code) => {
                let (verdict, promo_id) = self
                    .validate_code(code, store, service_type)
                    .await?;
                if !verdict.valid {
                    bail!("{}", verdict.message);
                }
                (Some(verdict), promo_id)
            }
            None => (None, None),
        };

        let draft = build_order(
            store.state(),
            &CheckoutRequest {
                user_id,
                service_type,
                delivery_fee,
                promo: verdict.as_ref(),
                delivery_address: address,
            },
        )?;
        let record = self.backend.create_order(&draft).await?;

        if let (Some(verdict), Some(promo_id)) = (&verdict, promo_id) {
            let redemption = PromoRedemption {
                promo_code_id: promo_id.clone(),
                user_id: user_id.to_string(),
                order_id: Some(record.id.clone()),
                discount_amount: verdict.discount_amount,
            };
            // The order stands even if bookkeeping fails
            if let Err(e) = self.backend.record_promo_redemption(&redemption).await {
                warn!(error = %e, "Failed to record promo redemption");
            }
            if let Err(e) = self.backend.increment_promo_usage(&promo_id).await {
                warn!(error = %e, "Failed to increment promo usage");
            }
        }

        store.clear_cart();
        if self.json {
            return self.print_json(&record);
        }
        println!(
            "Order {} placed: {} ({:?})",
            record.id,
            format_money(record.total_amount),
            record.status
        );
        Ok(())
    }

    /// Service type and delivery fee of the cart's restaurant
    async fn cart_terms(&self, store: &CartStore) -> Result<CartTerms> {
        let restaurant = match store.state().restaurant_id.as_deref() {
            Some(id) => self.backend.get_restaurant(id).await?,
            None => None,
        };
        Ok(CartTerms::resolve(restaurant.as_ref(), self.config.delivery_fee))
    }

    // ========== Catalog ==========

    async fn restaurants(&self, args: RestaurantsArgs) -> Result<()> {
        let mut rows = match args.search.as_deref() {
            Some(term) => self.backend.search_restaurants(term).await?,
            None => self.backend.list_restaurants(args.service).await?,
        };
        if let Some(service) = args.service {
            rows.retain(|r| r.service_type == service);
        }

        let ranked: Vec<_> = match args.near {
            Some(origin) => geo::sort_by_distance(origin, rows),
            None => rows.into_iter().map(|r| (r, None)).collect(),
        };

        if self.json {
            let rows: Vec<_> = ranked
                .iter()
                .map(|(r, km)| serde_json::json!({ "restaurant": r, "distance_km": km }))
                .collect();
            return self.print_json(&rows);
        }

        if ranked.is_empty() {
            println!("No listings found.");
        }
        for (r, km) in &ranked {
            let rating = r.rating.map(|v| format!("{:.1}", v)).unwrap_or_else(|| "-".into());
            let distance = km.map(geo::format_distance).unwrap_or_default();
            let status = if r.is_open { "" } else { " (closed)" };
            println!(
                "{:<36} {:<10} rating {:<4} delivery {:>6} {:>8}{}  [{}]",
                r.name,
                r.service_type,
                rating,
                format_money(r.delivery_fee),
                distance,
                status,
                r.id
            );
        }
        Ok(())
    }

    async fn menu(&self, restaurant_id: &str) -> Result<()> {
        let items = self.backend.menu_items(restaurant_id).await?;
        if self.json {
            return self.print_json(&items);
        }

        let mut category: Option<&str> = None;
        for item in &items {
            let current = item.category.as_deref().unwrap_or("Other");
            if category != Some(current) {
                println!("{}", current);
                category = Some(current);
            }
            println!("  {:<36} {:>8}  [{}]", item.name, format_money(item.price), item.id);
        }
        if items.is_empty() {
            println!("No items available.");
        }
        Ok(())
    }

    async fn orders(&self) -> Result<()> {
        let user_id = self
            .user_id()
            .context("set MERCATO_USER_ID to see your orders")?;
        let history = self.backend.list_orders(user_id).await?;
        let summary = orders::summarize_orders(&history);

        if self.json {
            return self.print_json(&serde_json::json!({ "orders": history, "summary": summary }));
        }

        for order in &history {
            println!(
                "{}  {:<8} {:>10}  {:?}  [{}]",
                order.created_at.format("%Y-%m-%d %H:%M"),
                order.service_type,
                format_money(order.total_amount),
                order.status,
                order.id
            );
        }
        println!(
            "{} orders ({} cancelled), spent {}, average {}",
            summary.order_count,
            summary.cancelled_count,
            format_money(summary.total_spent),
            format_money(summary.average_order_value)
        );
        Ok(())
    }

    // ========== Promo ==========

    /// Fetch and validate a code against the cart; returns the code's id
    /// alongside the verdict when it exists
    async fn validate_code(
        &self,
        code: &str,
        store: &CartStore,
        service_type: ServiceType,
    ) -> Result<(PromoVerdict, Option<String>)> {
        let promo = self.backend.find_promo_code(code).await?;

        let user_redemptions = match (&promo, self.user_id()) {
            (Some(p), Some(user_id)) => self.backend.promo_redemption_count(&p.id, user_id).await?,
            _ => 0,
        };

        let ctx = PromoContext {
            order_total: store.subtotal(),
            restaurant_id: store.state().restaurant_id.as_deref(),
            service_type,
            user_redemptions,
            now: Utc::now(),
        };
        let verdict = validate_promo(promo.as_ref(), &ctx);
        Ok((verdict, promo.map(|p| p.id)))
    }

    async fn promo_check(&self, code: &str) -> Result<()> {
        let store = open_cart_store(&self.config)?;
        let terms = self.cart_terms(&store).await?;
        let (verdict, _) = self.validate_code(code, &store, terms.service_type).await?;

        if self.json {
            return self.print_json(&verdict);
        }
        println!("{}", verdict.message);
        if verdict.valid {
            let total = (store.total(terms.delivery_fee) - verdict.discount_amount).max(Decimal::ZERO);
            println!("New total: {}", format_money(total));
        }
        Ok(())
    }

    // ========== Assistant and experiments ==========

    fn chat(&self, message: &str) -> Result<()> {
        let reply = chatbot::reply(message);
        if self.json {
            return self.print_json(&reply);
        }
        println!("{}", reply.response);
        Ok(())
    }

    async fn variant(&self, experiment_id: &str) -> Result<()> {
        let active = self.backend.active_experiments().await?;
        let Some(experiment) = active.iter().find(|e| e.id == experiment_id) else {
            bail!("experiment {} is not active", experiment_id);
        };

        let Some(variant) = experiments::assign_variant(experiment, self.user_id()) else {
            bail!("experiment {} has no assignable variants", experiment_id);
        };

        if let Some(user_id) = self.user_id() {
            let assignment = ExperimentAssignment {
                experiment_id: experiment.id.clone(),
                user_id: user_id.to_string(),
                variant: variant.name.clone(),
            };
            if let Err(e) = self.backend.record_assignment(&assignment).await {
                warn!(error = %e, "Failed to record experiment assignment");
            }
        }

        if self.json {
            return self.print_json(variant);
        }
        println!("{}", variant.name);
        Ok(())
    }
}

/// Ask a yes/no question on the terminal (default no)
fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_point() {
        let p = parse_point("40.41, -3.70").unwrap();
        assert_eq!(p.latitude, 40.41);
        assert_eq!(p.longitude, -3.70);
        assert!(parse_point("40.41").is_err());
        assert!(parse_point("95,0").is_err());
    }

    #[test]
    fn test_negative_quantity_parses() {
        let cli = Cli::try_parse_from(["mercato", "cart", "set-qty", "m1", "-2"]).unwrap();
        match cli.command {
            Command::Cart(CartCommand::SetQty { quantity, .. }) => assert_eq!(quantity, -2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_replace_and_keep_conflict() {
        assert!(Cli::try_parse_from(["mercato", "cart", "add", "m1", "--replace", "--keep"]).is_err());
    }
}
