use serde::Serialize;

/// A Card Hobby seller the dashboard knows by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Seller {
    pub id: &'static str,
    pub name: &'static str,
    pub url: &'static str,
}

const KNOWN_SELLERS: &[Seller] = &[
    Seller {
        id: "387957",
        name: "Lucky1of1card",
        url: "https://www.cardhobby.com/#/seller/detail/387957",
    },
    Seller {
        id: "593126",
        name: "Hachiware",
        url: "https://www.cardhobby.com/#/seller/detail/593126",
    },
    Seller {
        id: "19773",
        name: "LAauction",
        url: "https://www.cardhobby.com/#/seller/detail/19773",
    },
    Seller {
        id: "973",
        name: "Trac",
        url: "https://www.cardhobby.com/#/seller/detail/973",
    },
    Seller {
        id: "156145",
        name: "Lukards",
        url: "https://www.cardhobby.com/#/seller/detail/156145",
    },
    Seller {
        id: "642291",
        name: "来来来",
        url: "https://www.cardhobby.com/#/seller/detail/642291",
    },
];

pub fn known_sellers() -> &'static [Seller] {
    KNOWN_SELLERS
}

/// Look up a known seller by the `seller_ref` stored on an item.
pub fn seller_for_url(seller_ref: &str) -> Option<&'static Seller> {
    KNOWN_SELLERS.iter().find(|s| s.url == seller_ref)
}
