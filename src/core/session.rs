use crate::core::default_set::DefaultSet;
use crate::domain::model::{Address, PaymentMethod, UserProfile};
use crate::domain::ports::Bootstrap;

pub type AddressBook = DefaultSet<Address>;
pub type Wallet = DefaultSet<PaymentMethod>;

pub const PROFILE_ADDRESS_ALIAS: &str = "Casa";

/// 從使用者資料建立第一筆地址
#[derive(Debug, Clone)]
pub struct ProfileBootstrap {
    profile: UserProfile,
}

impl ProfileBootstrap {
    pub fn new(profile: UserProfile) -> Self {
        Self { profile }
    }
}

impl Bootstrap<Address> for ProfileBootstrap {
    fn initial_records(&self) -> Vec<Address> {
        let street = match self.profile.street.as_deref().map(str::trim) {
            Some(street) if !street.is_empty() => street,
            _ => return Vec::new(),
        };

        let mut address = Address::new(
            PROFILE_ADDRESS_ALIAS,
            street,
            self.profile.city.as_deref().unwrap_or_default(),
            self.profile.details.as_deref().unwrap_or_default(),
        );
        address.is_default = true;
        vec![address]
    }
}

/// Per-customer state: one address book and one wallet, each with its own
/// lock. Owned by whoever holds the user session and passed by reference.
#[derive(Debug)]
pub struct CustomerSession {
    addresses: AddressBook,
    wallet: Wallet,
}

impl Default for CustomerSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomerSession {
    pub fn new() -> Self {
        Self::with_records(Vec::new(), Vec::new())
    }

    pub fn with_records(addresses: Vec<Address>, payment_methods: Vec<PaymentMethod>) -> Self {
        Self {
            addresses: DefaultSet::with_records("addresses", addresses),
            wallet: DefaultSet::with_records("payment_methods", payment_methods),
        }
    }

    /// One-time initialisation, run by the owner before first use.
    pub fn bootstrap<A, P>(&self, addresses: &A, payment_methods: &P) -> (usize, usize)
    where
        A: Bootstrap<Address> + ?Sized,
        P: Bootstrap<PaymentMethod> + ?Sized,
    {
        let loaded = (
            self.addresses.bootstrap(addresses),
            self.wallet.bootstrap(payment_methods),
        );
        tracing::info!(
            "🛒 Session ready: {} addresses, {} payment methods",
            self.addresses.len(),
            self.wallet.len()
        );
        loaded
    }

    pub fn addresses(&self) -> &AddressBook {
        &self.addresses
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    /// 結帳時預先帶入的地址
    pub fn default_address(&self) -> Option<Address> {
        self.addresses.default_record()
    }

    pub fn default_payment_method(&self) -> Option<PaymentMethod> {
        self.wallet.default_record()
    }

    pub fn into_parts(self) -> (Vec<Address>, Vec<PaymentMethod>) {
        (self.addresses.into_records(), self.wallet.into_records())
    }
}
