//! Demo data / 演示数据

use crate::error::StoreError;
use crate::models::NewBook;
use crate::store::BookStore;

const DEMO_BOOKS: &[(&str, &str, i64)] = &[
    ("Laskar Pelangi", "Andrea Hirata", 2005),
    ("Bumi Manusia", "Pramoedya Ananta Toer", 1980),
    ("Negeri 5 Menara", "Ahmad Fuadi", 2009),
    ("Ayat-Ayat Cinta", "Habiburrahman El Shirazy", 2004),
    ("Sang Pemimpi", "Andrea Hirata", 2006),
    ("Perahu Kertas", "Dee Lestari", 2009),
    ("Ronggeng Dukuh Paruk", "Ahmad Tohari", 1982),
    ("Supernova: Ksatria, Puteri, dan Bintang Jatuh", "Dee Lestari", 2001),
    ("Ketika Cinta Bertasbih", "Habiburrahman El Shirazy", 2007),
    ("5 cm", "Donny Dhirgantoro", 2005),
    ("Pulang", "Leila S. Chudori", 2012),
    ("Cantik Itu Luka", "Eka Kurniawan", 2002),
    ("Saman", "Ayu Utami", 1998),
    ("Gadis Kretek", "Ratih Kumala", 2012),
    ("Laut Bercerita", "Leila S. Chudori", 2017),
    ("Filosofi Kopi", "Dee Lestari", 2006),
    ("Edensor", "Andrea Hirata", 2007),
    ("Amba", "Laksmi Pamuntjak", 2012),
    ("Orang-Orang Biasa", "Andrea Hirata", 2019),
    ("Aroma Karsa", "Dee Lestari", 2018),
    ("Sirkus Pohon", "Andrea Hirata", 2017),
];

/// Populate an empty store with demo books / 空库时写入演示数据
///
/// Returns the number of books inserted. Individual insert failures are logged
/// and skipped; only the initial count can fail the whole operation.
pub async fn seed_if_empty(store: &dyn BookStore) -> Result<usize, StoreError> {
    let count = store.count().await?;
    if count > 0 {
        tracing::info!("Books table already has {} rows, skipping seed", count);
        return Ok(0);
    }

    tracing::info!("Seeding demo books...");
    let mut inserted = 0;
    for (title, author, year) in DEMO_BOOKS {
        let book = NewBook { title: title.to_string(), author: author.to_string(), year: *year };
        match store.create(&book).await {
            Ok(created) => {
                inserted += 1;
                tracing::debug!("Seeded book: {} (id {})", created.title, created.id);
            }
            Err(e) => tracing::warn!("Failed to seed book '{}': {}", title, e),
        }
    }
    tracing::info!("Seeding finished, {} books inserted", inserted);
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::store::SqliteBookStore;

    #[tokio::test]
    async fn test_seed_only_when_empty() {
        let pool = db::test_support::memory_pool().await;
        db::run_migrations(&pool, false).await.unwrap();
        let store = SqliteBookStore::new(pool);

        assert_eq!(seed_if_empty(&store).await.unwrap(), DEMO_BOOKS.len());
        assert_eq!(seed_if_empty(&store).await.unwrap(), 0);
        assert_eq!(store.count().await.unwrap(), DEMO_BOOKS.len() as i64);

        let first = store.get_by_id(1).await.unwrap();
        assert_eq!(first.title, "Laskar Pelangi");
    }
}
