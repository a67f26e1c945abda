use client_core::state::{AddressState, EntityState};
use shared::domain::{Address, Customer, Entity};

pub fn success<E: Entity>(entities: &EntityState<E>) {
    if let Some(message) = &entities.last_success {
        println!("{message}");
    }
}

pub fn customers(customers: &[Customer]) {
    if customers.is_empty() {
        println!("no customers");
        return;
    }
    println!("{:>6}  {:<28} {:<16} EMAIL", "ID", "NAME", "PHONE");
    for customer in customers {
        println!(
            "{:>6}  {:<28} {:<16} {}",
            customer.id,
            customer.full_name(),
            customer.phone,
            customer.email.as_deref().unwrap_or("-")
        );
    }
}

pub fn customer_detail(customer: &Customer) {
    println!("customer {}", customer.id);
    println!("  name:  {}", customer.full_name());
    println!("  phone: {}", customer.phone);
    if let Some(email) = &customer.email {
        println!("  email: {email}");
    }
    if let Some(addresses) = &customer.addresses {
        println!("  addresses ({}):", addresses.len());
        for address in addresses {
            println!("    {}", address_line(address));
        }
    }
}

pub fn address_detail(address: &Address) {
    println!("address {} (customer {})", address.id, address.customer_id);
    println!("  {}", address_line(address));
}

pub fn address_page(state: &AddressState) {
    if !state.filters.is_empty() {
        let filters: Vec<String> = state
            .filters
            .active()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        println!("filters: {}", filters.join(", "));
    }
    if state.entities.collection.is_empty() {
        println!("no addresses");
    }
    for address in &state.entities.collection {
        println!("{:>6}  {}", address.id, address_line(address));
    }
    let pagination = &state.pagination;
    println!(
        "page {} of {} ({} addresses)",
        pagination.page, pagination.total_pages, pagination.total_count
    );
}

fn address_line(address: &Address) -> String {
    let mut line = address.address_line1.clone();
    if let Some(second) = &address.address_line2 {
        line.push_str(", ");
        line.push_str(second);
    }
    let primary = if address.is_primary { " [primary]" } else { "" };
    format!(
        "{line}, {}, {} {}{primary}",
        address.city, address.state, address.pin_code
    )
}
