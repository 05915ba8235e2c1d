//! Interactive storefront session.
//!
//! Owns the cart and the catalog-backed views. Catalog failures land in the
//! views as [`LoadState`]s; the cart only ever receives resolved
//! [`ProductRef`](storefront_types::ProductRef)s.

use std::io::{self, Write};

use storefront_catalog::CatalogClient;
use storefront_core::{Cart, LoadState, NotificationQueue, OrderSummary};
use storefront_types::{
    Category, NonEmptyStaticStr, Product, ProductFilter, ProductId, truncate_with_ellipsis,
};

use crate::command::{Command, FilterCommand, HELP};

const NAME_WIDTH: usize = 32;
const DESCRIPTION_WIDTH: usize = 240;
const NOT_CONFIGURED: NonEmptyStaticStr = NonEmptyStaticStr::new(
    "[Loading failed] The catalog is not configured. Set STOREFRONT_CATALOG_URL and STOREFRONT_CATALOG_KEY or add a [catalog] section to ~/.storefront/config.toml.",
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<W> {
    catalog: Option<CatalogClient>,
    cart: Cart<NotificationQueue>,
    filter: ProductFilter,
    listing: LoadState<Vec<Product>>,
    detail: LoadState<Product>,
    recommendations: Vec<Product>,
    currency: String,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(catalog: Option<CatalogClient>, currency: impl Into<String>, out: W) -> Self {
        Self {
            catalog,
            cart: Cart::new(NotificationQueue::new()),
            filter: ProductFilter::default(),
            listing: LoadState::Loading,
            detail: LoadState::Loading,
            recommendations: Vec::new(),
            currency: currency.into(),
            out,
        }
    }

    #[cfg(test)]
    pub fn cart(&self) -> &Cart<NotificationQueue> {
        &self.cart
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    /// Parse and run one input line.
    pub async fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        match Command::parse(line) {
            Ok(Some(command)) => self.execute(command).await,
            Ok(None) => Ok(Flow::Continue),
            Err(err) => {
                writeln!(self.out, "{err}")?;
                Ok(Flow::Continue)
            }
        }
    }

    pub async fn execute(&mut self, command: Command) -> io::Result<Flow> {
        match command {
            Command::Products { category } => {
                self.load_listing(category).await;
                self.render_listing()?;
            }
            Command::Categories => self.render_categories()?,
            Command::Filter(filter) => {
                self.apply_filter(filter);
                self.render_listing()?;
            }
            Command::Show(id) => {
                self.load_detail(&id).await;
                self.render_detail()?;
            }
            Command::Add(id) => match self.find_loaded(&id) {
                Some(product) => {
                    let item = product.as_cart_ref();
                    self.cart.add(item);
                }
                None => writeln!(
                    self.out,
                    "Product {id} is not loaded. Use `products` or `show {id}` first."
                )?,
            },
            Command::Remove(id) => self.cart.remove(&id),
            Command::Quantity { id, quantity } => {
                self.cart.update_quantity(&id, quantity);
                self.render_cart()?;
            }
            Command::Increment(id) => {
                self.cart.increment(&id);
                self.render_cart()?;
            }
            Command::Decrement(id) => {
                self.cart.decrement(&id);
                self.render_cart()?;
            }
            Command::Cart => self.render_cart()?,
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }

        self.flush_notifications()?;
        Ok(Flow::Continue)
    }

    fn flush_notifications(&mut self) -> io::Result<()> {
        for notification in self.cart.sink_mut().take() {
            tracing::info!(product_id = %notification.product_id(), "{}", notification.message());
            writeln!(self.out, "* {}", notification.message())?;
        }
        Ok(())
    }

    async fn load_listing(&mut self, category: Option<Category>) {
        let Some(catalog) = &self.catalog else {
            self.listing = not_configured();
            return;
        };
        let result = catalog.list_products(category.map(Category::slug)).await;
        self.listing = LoadState::from_result(result.map_err(|e| e.into_load_failure("products")));
    }

    async fn load_detail(&mut self, id: &ProductId) {
        self.recommendations.clear();
        let Some(catalog) = &self.catalog else {
            self.detail = not_configured();
            return;
        };

        let result = catalog.get_product(id).await;
        self.detail = LoadState::from_result(result.map_err(|e| e.into_load_failure("product")));

        // Recommendations are best-effort; the product stays visible without them.
        if let Some(product) = self.detail.loaded()
            && let Some(category_id) = &product.category_id
        {
            match catalog.recommended_products(category_id, &product.id).await {
                Ok(products) => self.recommendations = products,
                Err(err) => {
                    tracing::warn!(product = %product.id, error = %err, "Failed to load recommendations");
                }
            }
        }
    }

    fn apply_filter(&mut self, filter: FilterCommand) {
        match filter {
            FilterCommand::Min(value) => self.filter.set_min(value),
            FilterCommand::Max(value) => self.filter.set_max(value),
            FilterCommand::Sort(sort_by) => self.filter.sort_by = sort_by,
            FilterCommand::Reset => self.filter = ProductFilter::default(),
        }
        tracing::debug!(
            min = self.filter.price_range.min(),
            max = self.filter.price_range.max(),
            sort = self.filter.sort_by.as_str(),
            "Filter changed"
        );
    }

    /// A product from the current detail, recommendations, or listing.
    fn find_loaded(&self, id: &ProductId) -> Option<&Product> {
        let detail = self.detail.loaded().into_iter();
        let listing = self.listing.loaded().into_iter().flatten();
        detail
            .chain(self.recommendations.iter())
            .chain(listing)
            .find(|product| &product.id == id)
    }

    fn render_categories(&mut self) -> io::Result<()> {
        writeln!(self.out, "Categories:")?;
        for category in Category::ALL {
            writeln!(self.out, "  {:<12} {}", category.slug(), category.display_name())?;
        }
        Ok(())
    }

    fn render_listing(&mut self) -> io::Result<()> {
        let products = match &self.listing {
            LoadState::Loading => return writeln!(self.out, "No products loaded. Try `products`."),
            LoadState::NotFound => return writeln!(self.out, "No products found."),
            LoadState::Failed(message) => return writeln!(self.out, "{message}"),
            LoadState::Loaded(products) => products,
        };

        let range = self.filter.price_range;
        let visible = self.filter.apply(products);
        writeln!(
            self.out,
            "Products ({} of {}) | {} | {}{}-{}{}",
            visible.len(),
            products.len(),
            self.filter.sort_by.label(),
            self.currency,
            range.min(),
            self.currency,
            range.max(),
        )?;

        if visible.is_empty() {
            return writeln!(self.out, "No products match the current filters.");
        }
        for product in visible {
            writeln!(
                self.out,
                "  {:<8} {:<width$} {:>10}  {} ({})",
                product.id,
                truncate_with_ellipsis(&product.name, NAME_WIDTH),
                product.price.display_with(&self.currency),
                stars(product),
                product.reviews_count,
                width = NAME_WIDTH,
            )?;
        }
        Ok(())
    }

    fn render_detail(&mut self) -> io::Result<()> {
        let product = match &self.detail {
            LoadState::Loading => return Ok(()),
            LoadState::NotFound => {
                return writeln!(self.out, "Product not found. Try `products` to browse.");
            }
            LoadState::Failed(message) => return writeln!(self.out, "{message}"),
            LoadState::Loaded(product) => product,
        };

        writeln!(self.out, "{} [{}]", product.name, product.id)?;
        if let Some(category) = &product.categories {
            writeln!(self.out, "Category: {}", category.name)?;
        }
        writeln!(
            self.out,
            "{}  {} {:.1} ({} reviews)",
            product.price.display_with(&self.currency),
            stars(product),
            product.rating,
            product.reviews_count
        )?;
        if product.in_stock() {
            writeln!(self.out, "In stock ({})", product.stock)?;
        } else {
            writeln!(self.out, "Out of stock")?;
        }
        if !product.description.is_empty() {
            writeln!(
                self.out,
                "{}",
                truncate_with_ellipsis(&product.description, DESCRIPTION_WIDTH)
            )?;
        }
        writeln!(self.out, "Free shipping")?;

        if !self.recommendations.is_empty() {
            writeln!(self.out, "You might also like:")?;
            for rec in &self.recommendations {
                writeln!(
                    self.out,
                    "  {:<8} {:<width$} {:>10}",
                    rec.id,
                    truncate_with_ellipsis(&rec.name, NAME_WIDTH),
                    rec.price.display_with(&self.currency),
                    width = NAME_WIDTH,
                )?;
            }
        }
        Ok(())
    }

    fn render_cart(&mut self) -> io::Result<()> {
        let state = self.cart.state();
        if state.is_empty() {
            return writeln!(self.out, "Your cart is empty. Try `products` to browse.");
        }

        let summary = OrderSummary::from_state(state);
        let noun = if summary.item_count == 1 { "item" } else { "items" };
        writeln!(self.out, "Cart ({} {noun}):", summary.item_count)?;
        for item in state.items() {
            writeln!(
                self.out,
                "  {:<8} {:<width$} {:>3} x {:>10} = {:>10}",
                item.id(),
                truncate_with_ellipsis(item.name(), NAME_WIDTH),
                item.quantity(),
                item.price().display_with(&self.currency),
                item.line_total().display_with(&self.currency),
                width = NAME_WIDTH,
            )?;
        }

        for (label, value) in summary.lines(&self.currency) {
            writeln!(self.out, "  {label:<10} {value}")?;
        }
        Ok(())
    }
}

fn not_configured<T>() -> LoadState<T> {
    LoadState::Failed(NOT_CONFIGURED.into())
}

fn stars(product: &Product) -> String {
    let full = usize::from(product.full_stars());
    format!("{}{}", "*".repeat(full), ".".repeat(5 - full))
}
