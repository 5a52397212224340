//! Demo partners and chargers for local runs

use tracing::info;

use crate::domain::{
    ChargerConfiguration, ChargerStatus, DomainResult, Location, NewCharger, NewPartner,
    PartnerSettings, PartnerStatus, RepositoryProvider,
};

fn partner(
    name: &str,
    email: &str,
    description: &str,
    api_key: &str,
    max_chargers: i32,
    timezone: &str,
) -> NewPartner {
    NewPartner {
        name: name.to_string(),
        email: email.to_string(),
        description: description.to_string(),
        api_key: api_key.to_string(),
        status: PartnerStatus::Active,
        max_chargers,
        settings: PartnerSettings {
            timezone: Some(timezone.to_string()),
            language: Some("en".to_string()),
            notifications: Some(true),
            ..Default::default()
        },
    }
}

fn charger(
    partner_id: i32,
    charger_id: &str,
    name: &str,
    status: ChargerStatus,
    (latitude, longitude, address): (f64, f64, &str),
    (power_rating, connector_type, voltage, current): (f64, &str, f64, f64),
) -> NewCharger {
    NewCharger {
        charger_id: charger_id.to_string(),
        partner_id,
        name: Some(name.to_string()),
        status,
        location: Some(Location {
            latitude,
            longitude,
            address: Some(address.to_string()),
        }),
        configuration: Some(ChargerConfiguration {
            power_rating,
            connector_type: connector_type.to_string(),
            voltage,
            current,
        }),
    }
}

/// Inserts the demo data set when no partner exists yet.
/// Returns `true` when anything was written.
pub async fn seed_demo_data(repos: &dyn RepositoryProvider) -> DomainResult<bool> {
    if repos.partners().count().await? > 0 {
        return Ok(false);
    }

    let a = repos
        .partners()
        .insert(partner(
            "Partner A",
            "partnerA@example.com",
            "Demo partner operating in the United States",
            "api-key-partner-a",
            100,
            "UTC",
        ))
        .await?;
    let b = repos
        .partners()
        .insert(partner(
            "Partner B",
            "partnerB@example.com",
            "Demo partner operating in China",
            "api-key-partner-b",
            200,
            "Asia/Shanghai",
        ))
        .await?;

    let chargers = [
        charger(
            a.id,
            "CHARGER_A1",
            "Downtown Charger A1",
            ChargerStatus::Available,
            (40.7128, -74.0060, "New York"),
            (50.0, "CCS", 400.0, 125.0),
        ),
        charger(
            a.id,
            "CHARGER_A2",
            "Airport Charger A2",
            ChargerStatus::Charging,
            (34.0522, -118.2437, "Los Angeles"),
            (60.0, "CHAdeMO", 450.0, 150.0),
        ),
        charger(
            b.id,
            "CHARGER_B1",
            "Mall Charger B1",
            ChargerStatus::Blocked,
            (31.2304, 121.4737, "Shanghai"),
            (40.0, "Type2", 380.0, 100.0),
        ),
    ];

    for new in chargers {
        repos.chargers().insert(new).await?;
    }

    info!("Demo data seeded: 2 partners, 3 chargers");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    #[tokio::test]
    async fn seeds_once() {
        let repos = InMemoryRepositoryProvider::new();
        assert!(seed_demo_data(&repos).await.unwrap());
        assert!(!seed_demo_data(&repos).await.unwrap());

        let a = repos
            .partners()
            .find_by_api_key("api-key-partner-a")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(a.max_chargers, 100);
        assert_eq!(repos.chargers().count_for_partner(a.id).await.unwrap(), 2);

        let b1 = repos
            .chargers()
            .find_by_charger_id("CHARGER_B1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(b1.status, ChargerStatus::Blocked);
    }
}
