use crate::models::Listing;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use num::rational::BigRational;
use num::{BigInt, ToPrimitive, Zero};
use std::collections::BTreeMap;

/// The listings of one item, grouped by the snapshot they were seen in
#[derive(Debug, Clone, Default)]
pub struct ItemListings {
    per_snapshot: BTreeMap<DateTime<Utc>, Vec<Listing>>,
}

impl ItemListings {
    pub fn new<I: IntoIterator<Item = Listing>>(listings: I) -> Self {
        let mut item_listings = ItemListings::default();
        for listing in listings {
            item_listings.push(listing);
        }
        item_listings
    }

    pub fn push(&mut self, listing: Listing) {
        self.per_snapshot
            .entry(listing.observed_at)
            .or_default()
            .push(listing);
    }

    pub fn len(&self) -> usize {
        self.per_snapshot.values().map(|l| l.len()).sum()
    }
    pub fn is_empty(&self) -> bool {
        self.per_snapshot.is_empty()
    }

    /// Cheapest unit buyout of every snapshot
    ///
    /// Auctions without buyout are ignored, and so are snapshots where every
    /// auction lacks one.
    pub fn best_buyout(&self) -> BTreeMap<DateTime<Utc>, f64> {
        self.per_snapshot
            .iter()
            .filter_map(|(time, listings)| {
                min_unit_buyout(listings.iter()).map(|price| (*time, price))
            })
            .collect()
    }

    /// Cheapest unit buyout of every calendar day in the given time zone
    pub fn best_buyout_per_day<Tz: TimeZone>(&self, tz: &Tz) -> BTreeMap<NaiveDate, f64> {
        let mut per_day: BTreeMap<NaiveDate, Vec<&Listing>> = BTreeMap::new();
        for (time, listings) in self.per_snapshot.iter() {
            let day = time.with_timezone(tz).date_naive();
            per_day.entry(day).or_default().extend(listings.iter());
        }
        per_day
            .into_iter()
            .filter_map(|(day, listings)| {
                min_unit_buyout(listings.into_iter()).map(|price| (day, price))
            })
            .collect()
    }

    /// Average unit price paid to buy `n` units, cheapest auctions first
    ///
    /// Only the part of the last auction needed to reach `n` is counted.
    /// Snapshots that do not offer `n` units in total are left out.
    pub fn best_average_buyout(&self, n: i64) -> BTreeMap<DateTime<Utc>, f64> {
        self.per_snapshot
            .iter()
            .filter_map(|(time, listings)| {
                best_average_buyout(listings, n).map(|price| (*time, price))
            })
            .collect()
    }

    /// Cheapest unit buyout of the most recent snapshot that has one
    pub fn latest_best_buyout(&self) -> Option<f64> {
        self.best_buyout().values().next_back().copied()
    }
}

fn min_unit_buyout<'a, I: Iterator<Item = &'a Listing>>(listings: I) -> Option<f64> {
    listings
        .filter_map(|l| l.unit_buyout())
        .min()
        .and_then(|price| price.to_f64())
}

fn best_average_buyout(listings: &[Listing], n: i64) -> Option<f64> {
    if n <= 0 {
        return None;
    }
    let mut prices: Vec<(BigRational, i64)> = listings
        .iter()
        .filter_map(|l| l.unit_buyout().map(|price| (price, l.quantity)))
        .collect();
    prices.sort_by(|a, b| a.0.cmp(&b.0));

    let average = prices
        .into_iter()
        .fold(AveragePrice::new(), |acc, (price, quantity)| {
            acc.add_price(price, quantity, n)
        });
    if average.quantity < n {
        None
    } else {
        average.price.to_f64()
    }
}

/// Running average unit price over a filled quantity
#[derive(Debug, Clone, PartialEq)]
struct AveragePrice {
    price: BigRational,
    quantity: i64,
}

impl AveragePrice {
    fn new() -> Self {
        AveragePrice {
            price: BigRational::zero(),
            quantity: 0,
        }
    }

    fn add_price(self, price: BigRational, quantity: i64, limit: i64) -> AveragePrice {
        if self.quantity >= limit {
            return self;
        }
        // the last auction only counts for the units still missing
        let total = std::cmp::min(self.quantity + quantity, limit);
        let filled = BigRational::from_integer(BigInt::from(self.quantity));
        let needed = BigRational::from_integer(BigInt::from(total - self.quantity));
        let average = (self.price * filled + price * needed)
            / BigRational::from_integer(BigInt::from(total));
        AveragePrice {
            price: average,
            quantity: self.quantity + quantity,
        }
    }
}
