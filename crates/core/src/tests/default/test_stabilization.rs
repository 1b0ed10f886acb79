use std::sync::Arc;
use std::time::Duration;

use chord_transport::connections::MemoryTransport;

use super::assert_fingers_correct;
use super::assert_successor_cycle;
use super::TestRing;
use crate::dht::NodeRef;
use crate::dht::Stabilizer;
use crate::dht::TStabilize;
use crate::error::Result;
use crate::inspect::DHTInspect;
use crate::measure::MeasureCounter;

fn snapshot(ring: &TestRing) -> Vec<DHTInspect> {
    ring.nodes
        .iter()
        .map(|n| DHTInspect::inspect(&n.dht()))
        .collect()
}

#[tokio::test]
async fn test_converged_ring_is_stable() -> Result<()> {
    let ring = TestRing::join_all(5, &[4, 28, 13, 21, 9]).await?;
    let before = snapshot(&ring);
    for node in ring.nodes.iter() {
        node.stabilize().await?;
        node.fix_fingers().await?;
    }
    assert_eq!(snapshot(&ring), before);
    Ok(())
}

#[tokio::test]
async fn test_stabilize_adopts_closer_successor() -> Result<()> {
    let ring = TestRing::join_all(3, &[0, 4, 1]).await?;
    let node0 = ring.node(0);
    node0.dht().set_finger(0, ring.node(4).node_ref())?;

    node0.stabilize().await?;
    assert_eq!(node0.dht().successor()?.id.value(), 1);
    assert_eq!(
        ring.node(1).dht().predecessor()?.map(|p| p.id.value()),
        Some(0)
    );
    assert_successor_cycle(&ring);
    Ok(())
}

#[tokio::test]
async fn test_fix_fingers_repairs_table() -> Result<()> {
    let ring = TestRing::join_all(4, &[1, 5, 9, 13]).await?;
    let node = ring.node(1);
    // starts of node 1: 2, 3, 5, 9
    node.dht().set_finger(3, ring.node(5).node_ref())?;
    node.dht().set_finger(2, ring.node(13).node_ref())?;

    node.fix_fingers().await?;
    assert_fingers_correct(&ring);
    Ok(())
}

#[tokio::test]
async fn test_stabilizer_keeps_ring() -> Result<()> {
    let ring = TestRing::join_all(4, &[3, 7, 12]).await?;
    let handles: Vec<_> = ring
        .nodes
        .iter()
        .map(|n| {
            let stabilizer = Arc::new(Stabilizer::new(n.clone(), Duration::from_millis(5)));
            tokio::spawn(stabilizer.wait())
        })
        .collect();
    tokio::time::sleep(Duration::from_millis(50)).await;
    for handle in handles {
        handle.abort();
    }
    assert_successor_cycle(&ring);
    assert_fingers_correct(&ring);
    Ok(())
}

#[tokio::test]
async fn test_stabilizer_skips_unjoined_node() -> Result<()> {
    let ring = TestRing::new(3);
    let node = ring.prepare_node(2)?;
    let stabilizer = Stabilizer::new(node.clone(), Duration::from_secs(1));
    assert_eq!(stabilizer.interval(), Duration::from_secs(1));
    stabilizer.stabilize().await?;
    assert!(node.dht().is_alone()?);
    assert_eq!(node.dht().predecessor()?, None);
    Ok(())
}

#[tokio::test]
async fn test_join_over_delayed_transport() -> Result<()> {
    let mut ring = TestRing::with_transport(5, MemoryTransport::new().with_delay(1, 3))
        .rpc_timeout(Duration::from_secs(2));
    for id in [17, 2, 30, 11] {
        ring.join(id).await?;
    }
    assert_successor_cycle(&ring);
    assert_fingers_correct(&ring);
    Ok(())
}

#[tokio::test]
async fn test_update_finger_table_without_ttl_stays_local() -> Result<()> {
    let ring = TestRing::join_all(3, &[0, 4]).await?;
    let node0 = ring.node(0);
    let node4 = ring.node(4);
    let before = node4.dht().lock_finger()?.list().to_vec();
    let requests = node0.measure().get_count(MeasureCounter::RemoteRequest);

    let candidate = NodeRef::new(2.into(), "mem://2");
    assert!(node0.update_finger_table(candidate.clone(), 0, 0).await?);
    assert_eq!(node0.dht().successor()?, candidate);
    assert_eq!(node4.dht().lock_finger()?.list().to_vec(), before);
    assert_eq!(
        node0.measure().get_count(MeasureCounter::RemoteRequest),
        requests
    );
    Ok(())
}
