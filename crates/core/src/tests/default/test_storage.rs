use super::TestRing;
use crate::error::Error;
use crate::error::Result;

#[tokio::test]
async fn test_put_then_get_from_any_node() -> Result<()> {
    let ring = TestRing::join_all(5, &[3, 19, 11, 27]).await?;
    let keys = [0u64, 3, 4, 12, 19, 20, 28, 31];

    for (i, key) in keys.iter().enumerate() {
        let writer = &ring.nodes[i % ring.nodes.len()];
        let owner = writer.put((*key).into()).await?;
        assert_eq!(owner.id.value(), ring.expected_successor(*key));
    }

    for node in ring.nodes.iter() {
        for key in keys.iter() {
            assert_eq!(
                node.get((*key).into()).await?.map(|k| k.value()),
                Some(*key),
                "get({key}) from {}",
                node.id()
            );
        }
        assert_eq!(node.get(5.into()).await?, None);
    }
    Ok(())
}

#[tokio::test]
async fn test_keys_live_on_their_owner() -> Result<()> {
    let ring = TestRing::join_all(4, &[2, 9]).await?;
    for key in [1u64, 2, 5, 9, 10, 15] {
        ring.node(2).put(key.into()).await?;
    }
    let keys_of = |id: u64| {
        let dht = ring.node(id).dht();
        async move {
            dht.keys()
                .await
                .unwrap()
                .into_iter()
                .map(|k| k.value())
                .collect::<Vec<_>>()
        }
    };
    assert_eq!(keys_of(2).await, vec![1, 2, 10, 15]);
    assert_eq!(keys_of(9).await, vec![5, 9]);
    Ok(())
}

#[tokio::test]
async fn test_put_twice_keeps_one_key() -> Result<()> {
    let ring = TestRing::join_all(3, &[1]).await?;
    let node = ring.node(1);
    node.put(6.into()).await?;
    node.put(6.into()).await?;
    assert_eq!(node.dht().keys().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_key_surface_errors() -> Result<()> {
    let ring = TestRing::new(3);
    let node = ring.prepare_node(1)?;
    assert!(matches!(node.put(2.into()).await, Err(Error::RingEmpty)));
    assert!(matches!(node.get(2.into()).await, Err(Error::RingEmpty)));

    node.join().await?;
    assert!(matches!(
        node.put(8.into()).await,
        Err(Error::IdentifierOutOfRange(8, 8))
    ));
    assert_eq!(node.get(2.into()).await?, None);
    Ok(())
}
