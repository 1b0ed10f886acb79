use std::sync::Arc;
use std::time::Duration;

use chord_transport::connections::MemoryTransport;

use super::assert_fingers_correct;
use super::assert_successor_cycle;
use super::DroppingTransport;
use super::TestRing;
use crate::dht::Identifier;
use crate::error::Error;
use crate::error::Result;
use crate::node::NodeBuilder;

#[tokio::test]
async fn test_first_node_creates_ring() -> Result<()> {
    let ring = TestRing::join_all(3, &[5]).await?;
    let node = ring.node(5);
    assert!(node.is_joined());
    assert!(node.dht().is_alone()?);
    assert_eq!(node.dht().predecessor()?, Some(node.node_ref()));
    assert_eq!(ring.directory.members(), vec![node.node_ref()]);
    for id in 0..8 {
        assert_eq!(node.find_successor(Identifier::new(id)).await?.id.value(), 5);
    }
    Ok(())
}

#[tokio::test]
async fn test_join_three_nodes() -> Result<()> {
    let ring = TestRing::join_all(3, &[0, 4, 1]).await?;
    let node0 = ring.node(0);

    assert_eq!(node0.find_successor(2.into()).await?.id.value(), 4);
    assert_eq!(node0.find_predecessor(6.into()).await?.id.value(), 4);

    assert_successor_cycle(&ring);
    assert_fingers_correct(&ring);
    Ok(())
}

#[tokio::test]
async fn test_join_two_nodes() -> Result<()> {
    let ring = TestRing::join_all(3, &[3, 6]).await?;
    assert_successor_cycle(&ring);
    assert_fingers_correct(&ring);
    assert!(!ring.node(3).dht().is_alone()?);
    Ok(())
}

#[tokio::test]
async fn test_join_many_nodes() -> Result<()> {
    let ids = [37, 5, 100, 64, 12, 90, 77, 3, 126, 50];
    let ring = TestRing::join_all(7, &ids).await?;
    assert_eq!(ring.directory.len(), ids.len());
    assert_successor_cycle(&ring);
    assert_fingers_correct(&ring);
    Ok(())
}

#[tokio::test]
async fn test_join_with_default_ring_bits() -> Result<()> {
    let ring = TestRing::join_all(10, &[1000, 17, 512, 260]).await?;
    assert_successor_cycle(&ring);
    assert_fingers_correct(&ring);
    Ok(())
}

#[tokio::test]
async fn test_join_twice_is_noop() -> Result<()> {
    let ring = TestRing::join_all(3, &[0, 4]).await?;
    ring.node(4).join().await?;
    assert_eq!(ring.directory.len(), 2);
    assert_successor_cycle(&ring);
    Ok(())
}

#[tokio::test]
async fn test_join_duplicate_identifier() -> Result<()> {
    let ring = TestRing::join_all(3, &[2, 6]).await?;
    let twin = ring.prepare_node_at(6, "mem://twin/6")?;
    assert!(matches!(
        twin.join().await,
        Err(Error::DuplicateIdentifier(6))
    ));
    assert!(!twin.is_joined());
    assert_eq!(ring.directory.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_join_aborted_when_contact_does_not_answer() -> Result<()> {
    let ring = TestRing::new(3).rpc_timeout(std::time::Duration::from_millis(20));
    ring.register_silent(1);
    let node = ring.prepare_node(5)?;

    let ret = node.join().await;
    assert!(
        matches!(&ret, Err(Error::JoinAborted(e)) if matches!(**e, Error::Timeout { .. })),
        "{:?}",
        ret
    );
    assert!(!node.is_joined());
    assert!(node.dht().is_alone()?);
    assert_eq!(node.dht().predecessor()?, None);
    assert_eq!(ring.directory.lookup(5.into()), None);
    assert_eq!(node.transport().pending_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_join_aborted_while_seeding_leaves_ring_intact() -> Result<()> {
    // Node 2 sends six requests while seeding into {0, 4}, cut its link after each.
    for allowed in 0..6 {
        let ring = TestRing::join_all(3, &[0, 4]).await?;
        let transport = Arc::new(DroppingTransport::new(
            ring.transport.clone(),
            "mem://2",
            allowed,
        ));
        let joiner = NodeBuilder::new(2, transport, ring.directory.clone())
            .ring_bits(3)
            .rpc_timeout(Duration::from_millis(50))
            .build()?;

        let ret = joiner.join().await;
        assert!(
            matches!(&ret, Err(Error::JoinAborted(e)) if matches!(**e, Error::Timeout { .. })),
            "after {allowed} messages: {:?}",
            ret
        );
        assert!(!joiner.is_joined());
        assert_eq!(ring.directory.lookup(2.into()), None);

        assert_successor_cycle(&ring);
        assert_fingers_correct(&ring);
        assert_eq!(ring.node(0).put(1.into()).await?.id.value(), 4);
        assert_eq!(ring.node(4).get(1.into()).await?, Some(1.into()));
    }
    Ok(())
}

#[tokio::test]
async fn test_join_over_slow_links() -> Result<()> {
    // Every round trip stays below the deadline, lookups spanning several hops do not.
    let mut ring = TestRing::with_transport(10, MemoryTransport::new().with_delay(20, 35))
        .rpc_timeout(Duration::from_millis(100));
    for id in [1, 356, 700, 128, 910] {
        ring.join(id).await?;
    }
    assert_successor_cycle(&ring);
    assert_fingers_correct(&ring);
    Ok(())
}

#[tokio::test]
async fn test_invalid_node_config() {
    let ring = TestRing::new(3);
    assert!(matches!(
        ring.prepare_node(8),
        Err(Error::IdentifierOutOfRange(8, 8))
    ));
    let ring = TestRing::new(0);
    assert!(matches!(
        ring.prepare_node(0),
        Err(Error::InvalidRingBits(0))
    ));
}
